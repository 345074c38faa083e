//! Request bodies for chat management endpoints.

use serde::Deserialize;

use crate::domain::foundation::{UserId, ValidationError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrivateChatRequest {
    pub target_id: i64,
}

impl CreatePrivateChatRequest {
    pub fn target(&self) -> Result<UserId, ValidationError> {
        UserId::new(self.target_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupChatRequest {
    pub name: String,
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

impl CreateGroupChatRequest {
    pub fn invited(&self) -> Result<Vec<UserId>, ValidationError> {
        self.user_ids.iter().map(|raw| UserId::new(*raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_request_uses_camel_case_and_defaults_members() {
        let req: CreateGroupChatRequest =
            serde_json::from_str(r#"{"name": "Team", "userIds": [2, 3]}"#).unwrap();
        assert_eq!(req.invited().unwrap(), vec![UserId::from_raw(2), UserId::from_raw(3)]);

        let bare: CreateGroupChatRequest = serde_json::from_str(r#"{"name": "Team"}"#).unwrap();
        assert!(bare.user_ids.is_empty());
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        let req = CreatePrivateChatRequest { target_id: 0 };
        assert!(req.target().is_err());

        let group = CreateGroupChatRequest {
            name: "Team".to_string(),
            user_ids: vec![2, -1],
        };
        assert!(group.invited().is_err());
    }
}
