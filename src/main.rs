use servus::config::Config;
use servus::http::{Handler, HandlerError, Request, Response, ResponseWriter, StatusCode};
use servus::server;
use tokio::io::AsyncWrite;

/// Demo routes: `/yourproblem` is a 400, `/myproblem` a 500, anything else 200.
struct DemoHandler;

impl Handler for DemoHandler {
    async fn handle<W>(
        &self,
        writer: &mut ResponseWriter<W>,
        request: &Request,
    ) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match request.target() {
            "/yourproblem" => Err(HandlerError::new(
                StatusCode::BadRequest,
                "Your problem is not my problem\n",
            )),
            "/myproblem" => Err(HandlerError::new(
                StatusCode::InternalServerError,
                "Woopsie, my bad\n",
            )),
            _ => {
                writer.write_response(&Response::ok("All good, frfr\n")).await?;
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let server = server::serve(&cfg, DemoHandler).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.close();
    server.wait().await?;
    tracing::info!("Server gracefully stopped");

    Ok(())
}
