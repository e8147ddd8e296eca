use axum::Router;
use chrono::NaiveDate;
use skyfare_core::FlightSearch;

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{}", addr)
}

pub(crate) fn jfk_lax() -> FlightSearch {
    FlightSearch {
        origin: "JFK".to_string(),
        destination: "LAX".to_string(),
        departure_date: NaiveDate::from_ymd_opt(2030, 5, 2).unwrap(),
        adults: 2,
        non_stop: true,
    }
}
