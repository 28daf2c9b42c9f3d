use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use ev_rental::config::environment::EnvironmentConfig;
use ev_rental::database;
use ev_rental::routes::create_router;
use ev_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔌 EV Rental - Back office de alquiler de vehículos eléctricos");
    info!("==============================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());
    let app = create_router(app_state);

    let addr: SocketAddr = config.server_address().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Endpoints - Auth:");
    info!("   POST /api/auth/login - Login (staff / cliente / admin)");
    info!("   GET  /api/auth/me - Cuenta autenticada");
    info!("📋 Endpoints - Reservas:");
    info!("   GET  /api/booking - Listar reservas (filtros + paginación)");
    info!("   GET  /api/booking/:id - Detalle de reserva");
    info!("🚗 Endpoints - Check-in:");
    info!("   POST /api/checkin/scan - Paso 1: validar QR de la reserva");
    info!("   GET  /api/checkin/:id - Detalle de la sesión");
    info!("   POST /api/checkin/:id/documents - Paso 2: verificar licencia");
    info!("   POST /api/checkin/:id/photos - Subir fotos del vehículo");
    info!("   POST /api/checkin/:id/condition - Paso 3: estado + contrato");
    info!("   POST /api/checkin/:id/complete - Paso 4: entrega del vehículo");
    info!("   POST /api/checkin/:id/reject - Rechazar la sesión");
    info!("📝 Endpoints - Contratos:");
    info!("   GET  /api/contract - Listar contratos");
    info!("   GET  /api/contract/:id - Detalle de contrato");
    info!("   POST /api/contract/:id/submit - Draft -> Active");
    info!("   POST /api/contract/:id/sign - Firmar (cliente o staff)");
    info!("   POST /api/contract/:id/complete - Active -> Completed");
    info!("   POST /api/contract/:id/void - Anular contrato");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
