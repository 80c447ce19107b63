mod config;
mod db;
mod errors;
mod password;
mod payment;
mod routes;
mod server;
mod types;

#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    server::init_tracing("demo_shop");

    storefront_axum::init()
        .await
        .expect("Failed to initialize the session store");
    db::ShopStore::init()
        .await
        .expect("Failed to initialize the shop database");

    let app = routes::router();
    let port = *config::SHOP_PORT;

    server::spawn_http_server(port, app)
        .await
        .expect("HTTP server exited");
}
