use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

mod cli;
mod endpoint;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Args::parse();

    // Configuration errors are fatal before we serve anything
    let server = match server::Server::new(&args.endpoints) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            logger::log_error(&format!("unable to create server: {e}"));
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(args.listen, server))
}

async fn serve(
    addr: SocketAddr,
    server: Arc<server::Server>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = match create_reusable_listener(addr) {
        Ok(l) => l,
        Err(e) => {
            logger::log_error(&format!("unable to bind {addr}: {e}"));
            std::process::exit(1);
        }
    };
    logger::log_server_start(&addr);

    loop {
        match listener.accept().await {
            Ok((stream, _peer_addr)) => handle_connection(stream, Arc::clone(&server)),
            Err(e) => logger::log_error(&format!("failed to accept connection: {e}")),
        }
    }
}

/// Serve one connection in its own task. Requests on the connection are
/// handled sequentially by hyper; connections run concurrently.
fn handle_connection(stream: tokio::net::TcpStream, server: Arc<server::Server>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let server = Arc::clone(&server);
                async move {
                    Ok::<_, std::convert::Infallible>(server.handle_request(req).await)
                }
            }),
        );
        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Listener with `SO_REUSEADDR`, so quick edit-restart cycles don't trip
/// over sockets lingering in TIME_WAIT.
fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
