use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use realtime_chat::adapters::{
    app_router, ApiHandlers, ChatHandlers, Hub, JwtConfig, JwtSessionValidator, MessageHandlers,
    PostgresChatRepository, PostgresMessageRepository, PostgresUserRepository, UserHandlers,
    WebSocketState,
};
use realtime_chat::application::handlers::chat::{
    CreateGroupChatHandler, CreatePrivateChatHandler, GetUserChatsHandler,
};
use realtime_chat::application::handlers::message::{
    DeleteMessageHandler, GetChatMessagesHandler, SendMessageHandler, UpdateMessageHandler,
};
use realtime_chat::application::handlers::user::ListUsersHandler;
use realtime_chat::config::AppConfig;
use realtime_chat::ports::{
    ChatRepository, MessageRepository, RoomBroadcaster, SessionValidator, UserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.server.log_level)?,
    };
    if config.is_production() {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().compact().with_env_filter(filter).init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Realtime chat server starting"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let hub = Arc::new(Hub::new(config.hub.queue_capacity));
    let broadcaster: Arc<dyn RoomBroadcaster> = hub.clone();
    let messages: Arc<dyn MessageRepository> = Arc::new(PostgresMessageRepository::new(pool.clone()));
    let chats: Arc<dyn ChatRepository> = Arc::new(PostgresChatRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));

    let mut jwt = JwtConfig::new(config.auth.jwt_secret.clone());
    if let Some(issuer) = &config.auth.jwt_issuer {
        jwt = jwt.with_issuer(issuer.clone());
    }
    let validator: Arc<dyn SessionValidator> = Arc::new(JwtSessionValidator::new(jwt));

    let api = ApiHandlers {
        messages: MessageHandlers::new(
            Arc::new(SendMessageHandler::new(
                messages.clone(),
                chats.clone(),
                broadcaster.clone(),
            )),
            Arc::new(UpdateMessageHandler::new(messages.clone(), broadcaster.clone())),
            Arc::new(DeleteMessageHandler::new(messages.clone(), broadcaster)),
            Arc::new(GetChatMessagesHandler::new(messages.clone(), chats.clone())),
        ),
        chats: ChatHandlers::new(
            Arc::new(CreatePrivateChatHandler::new(users.clone(), chats.clone())),
            Arc::new(CreateGroupChatHandler::new(users.clone(), chats.clone())),
            Arc::new(GetUserChatsHandler::new(users.clone(), chats.clone(), messages)),
        ),
        users: UserHandlers::new(Arc::new(ListUsersHandler::new(users))),
    };
    let websocket = WebSocketState::new(hub.clone(), validator.clone(), chats)
        .with_close_grace(config.hub.close_grace());

    let app = app_router(api, validator, websocket, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let closed = hub.shutdown().await;
    tracing::info!(closed, "Hub drained");
    pool.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
