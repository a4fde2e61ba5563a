extern crate futures;
extern crate tokio_core;
extern crate tk_http10;
#[macro_use] extern crate log;
extern crate env_logger;

use std::env;
use std::net::SocketAddr;
use std::process::exit;

use futures::{Future, Stream};
use tokio_core::net::TcpListener;
use tokio_core::reactor::Core;

use tk_http10::server::{Config, Proto};
use tk_http10::proxy::Proxy;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let target: SocketAddr = match env::args().nth(1)
        .and_then(|a| a.parse().ok())
    {
        Some(addr) => addr,
        None => {
            eprintln!("usage: relay HOST:PORT");
            exit(1);
        }
    };

    let mut lp = Core::new().expect("create event loop");
    let handle = lp.handle();
    let addr = "0.0.0.0:8080".parse().unwrap();
    let listener = TcpListener::bind(&addr, &handle)
        .expect("bind address");
    let cfg = Config::new().done();
    println!("relaying {} -> {}", addr, target);

    let done = listener.incoming().for_each(move |(socket, peer)| {
        handle.spawn(
            Proto::new(socket, &cfg, Proxy::new(&handle, target))
            .map_err(move |e| info!("connection {}: {}", peer, e)));
        Ok(())
    });
    lp.run(done).expect("run relay");
}
