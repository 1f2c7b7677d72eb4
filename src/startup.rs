use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, App, HttpServer};

use crate::routes::default_route;

pub fn run(listener: TcpListener) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
