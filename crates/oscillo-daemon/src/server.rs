//! Daemon wiring: registry, sampler task, HTTP listener.

use std::future::Future;
use std::io;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use oscillo_core::error::{OscilloError, Result};
use oscillo_core::Registry;

use crate::app_state::AppState;
use crate::config::DaemonConfig;
use crate::router;
use crate::sampler::Sampler;

/// Run until the listener or the sampler fails. Only returns with an error.
pub async fn run(cfg: DaemonConfig) -> Result<()> {
    let registry = Registry::new();
    let sampler = Sampler::new(registry.clone(), &cfg.sampler)?;
    let state = AppState::new(registry.clone(), sampler.progress());
    let app = router::build_router(state);

    let addr = cfg.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| OscilloError::ListenerBind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

    tracing::info!(%addr, families = ?registry.families(), "oscillo-daemon listening");

    let sampler_task = tokio::spawn(sampler.run());
    let server = async move {
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
    };

    supervise(server, sampler_task).await
}

/// Wait for whichever of the HTTP server or the sampler task stops first and
/// turn that into the daemon's exit error. Neither is expected to stop.
pub async fn supervise<S>(server: S, mut sampler_task: JoinHandle<Result<()>>) -> Result<()>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::select! {
        res = server => {
            sampler_task.abort();
            res.map_err(|e| OscilloError::Server(e.to_string()))?;
            Err(OscilloError::Server("listener closed".into()))
        }
        res = &mut sampler_task => match res {
            Ok(Ok(())) => Err(OscilloError::Server("sampler stopped".into())),
            Ok(Err(e)) => Err(e),
            Err(e) => Err(OscilloError::Server(format!("sampler task failed: {e}"))),
        },
    }
}
