extern crate futures;
extern crate tokio_core;
extern crate tk_http10;
#[macro_use] extern crate log;
extern crate env_logger;

use std::env;
use std::path::Path;
use std::process::exit;
use std::sync::Arc;

use futures::{Future, Stream};
use tokio_core::net::TcpListener;
use tokio_core::reactor::Core;

use tk_http10::server::{Config, Proto};
use tk_http10::serve::{FileMap, Files};

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let mut map = FileMap::new();
    for arg in env::args().skip(1) {
        let ext = Path::new(&arg).extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        let id = map.add(arg.clone());
        if ext.is_empty() {
            println!("serving {} as /{}", arg, id);
        } else {
            println!("serving {} as /{}.{}", arg, id, ext);
        }
    }
    if map.len() == 0 {
        eprintln!("usage: serve FILE...");
        exit(1);
    }
    let map = Arc::new(map);

    let mut lp = Core::new().expect("create event loop");
    let handle = lp.handle();
    let addr = "0.0.0.0:8080".parse().unwrap();
    let listener = TcpListener::bind(&addr, &handle)
        .expect("bind address");
    let cfg = Config::new().done();
    println!("listening on {}", addr);

    let done = listener.incoming().for_each(move |(socket, peer)| {
        handle.spawn(
            Proto::new(socket, &cfg, Files::new(map.clone()))
            .map_err(move |e| info!("connection {}: {}", peer, e)));
        Ok(())
    });
    lp.run(done).expect("run server");
}
