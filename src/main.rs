use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

mod config;
mod handler;
mod http;
mod logger;
mod server;

use config::AppState;
use server::BindError;

fn main() -> ExitCode {
    let cfg = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::init(&cfg) {
        eprintln!("Failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = match runtime_builder.build() {
        Ok(r) => r,
        Err(e) => {
            logger::log_startup_error(&format!("failed to build runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> ExitCode {
    let addr = match cfg.get_socket_addr() {
        Ok(a) => a,
        Err(e) => {
            logger::log_startup_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let root = match cfg.resolve_root() {
        Ok(r) => r,
        Err(e) => {
            logger::log_startup_error(&format!("cannot resolve serving root: {e}"));
            return ExitCode::FAILURE;
        }
    };

    // Single-attempt bind: a held port is an operator problem, not ours to retry
    let listener = match server::bind(addr) {
        Ok(l) => l,
        Err(BindError::PortInUse { port }) => {
            logger::log_port_in_use(port);
            return ExitCode::FAILURE;
        }
        Err(BindError::Other(e)) => {
            logger::log_startup_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let state = Arc::new(AppState::new(cfg, root));
    logger::log_server_start(&addr, &state.root, &state.config);

    run_accept_loop(listener, state).await
}

/// Accept loop: owns the listener for the process lifetime, one spawned
/// task per connection, until an operator interrupt arrives.
async fn run_accept_loop(listener: TcpListener, state: Arc<AppState>) -> ExitCode {
    let shutdown = server::signal::shutdown();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_accept_error(&e);
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_server_stopped();
                return ExitCode::SUCCESS;
            }
        }
    }
}

/// Serve a single connection in a spawned task.
///
/// No timeouts are configured: a slow client can hold its connection, which
/// is acceptable for a local development tool.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { handler::handle_request(req, state, peer_addr).await }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}
