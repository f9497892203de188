use calc_cli::{Command, HttpHistoryRemote, Session, Step};
use calc_core::db::open_db_in_memory;
use calc_server::{serve_listener, AppState};
use reqwest::Url;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct RunningServer {
    api_url: Url,
    stop: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl RunningServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let state = AppState::new(open_db_in_memory().unwrap());
        let handle = tokio::spawn(async move {
            serve_listener(listener, state, async move {
                let _ = stopped.await;
            })
            .await
            .unwrap();
        });
        Self {
            api_url: Url::parse(&format!("http://{addr}/api/history")).unwrap(),
            stop: Some(stop),
            handle,
        }
    }

    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.unwrap();
    }
}

async fn run(session: &mut Session<HttpHistoryRemote>, line: &str) -> String {
    match session.handle(line.parse::<Command>().unwrap()).await {
        Step::Continue(text) => text,
        Step::Quit => panic!("unexpected quit"),
    }
}

#[tokio::test]
async fn calculations_round_trip_through_history_service() {
    let server = RunningServer::start().await;
    let mut session = Session::new(HttpHistoryRemote::new(server.api_url.clone()));
    assert!(session.start().await.contains("No recent calculations"));

    run(&mut session, "12 + 4 =").await;
    let text = run(&mut session, "10 / 4 =").await;
    assert!(text.contains("1. 10 / 4 = 2.5"));
    assert!(text.contains("2. 12 + 4 = 16"));
    assert!(!text.contains("not saved"));

    // A second client sees the same stored history.
    let mut other = Session::new(HttpHistoryRemote::new(server.api_url.clone()));
    other.start().await;
    assert_eq!(other.history().len(), 2);

    let text = run(&mut session, "delete 2").await;
    assert!(!text.contains("12 + 4"));

    run(&mut session, "clear-history").await;
    let text = run(&mut other, "history").await;
    assert!(text.contains("No recent calculations"));

    server.shutdown().await;
}

#[tokio::test]
async fn store_outage_keeps_session_usable() {
    let server = RunningServer::start().await;
    let api_url = server.api_url.clone();
    server.shutdown().await;

    let mut session = Session::new(HttpHistoryRemote::new(api_url));
    assert!(session.start().await.contains("history unavailable"));

    let text = run(&mut session, "7 * 0.1 =").await;
    assert!(text.contains("kept locally"));
    assert!(text.contains("7 * 0.1 = 0.7  (not saved)"));
    assert!(text.ends_with("> 0.7"));
}
