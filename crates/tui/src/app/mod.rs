use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use relay_core::chat::{ChatMessage, ConnectionStatus};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::backend::{Backend, BackendError};

pub mod chat;
pub mod input;

pub use input::InputBuffer;

/// Completed backend work, delivered to the UI loop.
#[derive(Debug)]
pub enum Reply {
    Answer(Result<String, BackendError>),
    Probe(ConnectionStatus),
}

struct Requests {
    backend: Arc<dyn Backend>,
    rt: Handle,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
}

pub struct App {
    pub messages: Vec<ChatMessage>,
    pub input: InputBuffer,
    /// `None` until the startup probe or the first reply resolves.
    pub status: Option<ConnectionStatus>,
    pub sending: bool,
    pub backend_url: String,
    pub chat_scroll: u16,
    pub should_quit: bool,
    pub dirty: bool,
    pub tick: u64,
    requests: Requests,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, backend_url: String, rt: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            messages: Vec::new(),
            input: InputBuffer::default(),
            status: None,
            sending: false,
            backend_url,
            chat_scroll: 0,
            should_quit: false,
            dirty: true,
            tick: 0,
            requests: Requests { backend, rt, tx, rx },
        }
    }

    /// Fire-and-forget liveness probe; only the status indicator changes.
    pub fn start_probe(&mut self) {
        let backend = self.requests.backend.clone();
        let tx = self.requests.tx.clone();
        self.requests.rt.spawn(async move {
            let status = backend.probe().await;
            let _ = tx.send(Reply::Probe(status));
        });
    }

    /// The guarded `Idle -> Sending` transition. Returns the prompt to send,
    /// or `None` when the submission is dropped.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.sending {
            return None;
        }
        let text = self.input.as_str().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text.clone()));
        self.input.clear();
        self.sending = true;
        self.chat_scroll = 0;
        self.dirty = true;
        Some(text)
    }

    pub fn submit(&mut self) {
        let Some(prompt) = self.begin_submit() else {
            return;
        };
        info!(target: "tui", "submit: input_len={} chars", prompt.len());
        let backend = self.requests.backend.clone();
        let tx = self.requests.tx.clone();
        self.requests.rt.spawn(async move {
            let res = backend.ask(&prompt).await;
            let _ = tx.send(Reply::Answer(res));
        });
    }

    pub fn apply(&mut self, reply: Reply) {
        match reply {
            Reply::Answer(res) => {
                self.sending = false;
                match res {
                    Ok(answer) => {
                        self.messages.push(ChatMessage::assistant(answer));
                        self.status = Some(ConnectionStatus::Online);
                    }
                    Err(e) => {
                        warn!(target: "tui", "ask failed: {}", e);
                        self.messages.push(ChatMessage::offline_notice());
                        self.status = Some(ConnectionStatus::Offline);
                    }
                }
                self.chat_scroll = 0;
            }
            Reply::Probe(status) => {
                self.status = Some(status);
            }
        }
        self.dirty = true;
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.sending {
            self.dirty = true;
        }
        loop {
            match self.requests.rx.try_recv() {
                Ok(reply) => self.apply(reply),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(n);
        self.dirty = true;
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(n);
        self.dirty = true;
    }

    pub fn insert_text(&mut self, s: &str) {
        if self.sending {
            return;
        }
        self.input.insert_text(s);
        self.dirty = true;
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::PageUp => return self.scroll_up(10),
            KeyCode::PageDown => return self.scroll_down(10),
            _ => {}
        }
        // Editing is disabled while a request is in flight.
        if self.sending {
            return;
        }
        match key.code {
            KeyCode::Enter
                if key
                    .modifiers
                    .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
            {
                self.input.insert_text("\n");
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char('w') if ctrl => self.input.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.input.kill_to_line_start(),
            KeyCode::Char('a') if ctrl => self.input.move_line_start(),
            KeyCode::Char('e') if ctrl => self.input.move_line_end(),
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                self.input.insert_text(c.encode_utf8(&mut buf));
            }
            KeyCode::Backspace => self.input.delete_left(),
            KeyCode::Delete => self.input.delete_right(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_line_start(),
            KeyCode::End => self.input.move_line_end(),
            _ => return,
        }
        self.dirty = true;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use relay_core::chat::{Sender as ChatSender, OFFLINE_NOTICE};

    use super::*;

    pub(crate) struct FakeBackend {
        pub asks: AtomicUsize,
        pub answer: Result<String, BackendError>,
        pub probe: ConnectionStatus,
    }

    impl FakeBackend {
        pub fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                asks: AtomicUsize::new(0),
                answer: Ok(text.to_string()),
                probe: ConnectionStatus::Online,
            })
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn ask(&self, _prompt: &str) -> Result<String, BackendError> {
            self.asks.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
        async fn probe(&self) -> ConnectionStatus {
            self.probe
        }
    }

    pub(crate) fn app_with(backend: Arc<dyn Backend>, rt: &tokio::runtime::Runtime) -> App {
        App::new(backend, "http://localhost:3000".into(), rt.handle().clone())
    }

    pub(crate) fn wait_idle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.sending && Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!app.sending, "reply did not arrive");
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn blank_input_is_ignored() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let backend = FakeBackend::answering("unused");
        let mut app = app_with(backend.clone(), &rt);

        app.insert_text("   \n  ");
        app.submit();
        assert!(app.messages.is_empty());
        assert!(!app.sending);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(backend.asks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn submit_while_sending_is_a_no_op() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(FakeBackend::answering("unused"), &rt);

        app.input.insert_text("first");
        assert_eq!(app.begin_submit().as_deref(), Some("first"));
        assert!(app.sending);
        assert!(app.input.is_empty());

        app.input.insert_text("second");
        assert_eq!(app.begin_submit(), None);
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.input.as_str(), "second");
    }

    #[test]
    fn typing_is_ignored_while_sending() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(FakeBackend::answering("unused"), &rt);
        app.input.insert_text("hi");
        app.begin_submit();

        app.on_key(key(KeyCode::Char('x')));
        app.insert_text("pasted");
        assert!(app.input.is_empty());
    }

    #[test]
    fn reply_transitions() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(FakeBackend::answering("unused"), &rt);

        app.input.insert_text(" Hello ");
        app.begin_submit();
        app.apply(Reply::Answer(Ok("Hi there!".into())));
        assert!(!app.sending);
        assert_eq!(app.status, Some(ConnectionStatus::Online));
        assert_eq!(
            app.messages,
            vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there!")]
        );

        app.input.insert_text("again");
        app.begin_submit();
        app.apply(Reply::Answer(Err(BackendError::Status(500))));
        assert_eq!(app.status, Some(ConnectionStatus::Offline));
        let last = app.messages.last().unwrap();
        assert_eq!(last.sender, ChatSender::Assistant);
        assert_eq!(last.text, OFFLINE_NOTICE);
        assert!(last.is_error);
    }

    #[test]
    fn probe_only_touches_status() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let backend = Arc::new(FakeBackend {
            asks: AtomicUsize::new(0),
            answer: Ok(String::new()),
            probe: ConnectionStatus::Error,
        });
        let mut app = app_with(backend.clone(), &rt);
        app.start_probe();

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.status.is_none() && Instant::now() < deadline {
            app.on_tick();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(app.status, Some(ConnectionStatus::Error));
        assert!(app.messages.is_empty());
        assert_eq!(backend.asks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn enter_submits_once_through_the_backend() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let backend = FakeBackend::answering("Hi there!");
        let mut app = app_with(backend.clone(), &rt);

        for c in "Hello".chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
        app.on_key(key(KeyCode::Enter));
        app.on_key(key(KeyCode::Enter));
        wait_idle(&mut app);

        assert_eq!(backend.asks.load(Ordering::SeqCst), 1);
        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[1].text, "Hi there!");
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(FakeBackend::answering("unused"), &rt);
        app.on_key(key(KeyCode::Char('a')));
        app.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.input.as_str(), "a\nb");
        assert!(app.messages.is_empty());
    }

    fn http_app(rt: &tokio::runtime::Runtime, url: String) -> App {
        let cfg = crate::config::ClientConfig {
            backend_url: url,
            probe: crate::config::ProbeMode::Health,
        };
        let backend = Arc::new(crate::backend::HttpBackend::new(&cfg).unwrap());
        App::new(backend, cfg.backend_url, rt.handle().clone())
    }

    #[test]
    fn hello_round_trip_over_http() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/ask"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"success": true, "answer": "Hi there!"})),
                )
                .mount(&server),
        );

        let mut app = http_app(&rt, server.uri());
        app.insert_text("Hello");
        app.submit();
        assert_eq!(app.messages, vec![ChatMessage::user("Hello")]);
        wait_idle(&mut app);

        assert_eq!(
            app.messages,
            vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there!")]
        );
        assert_eq!(app.status, Some(ConnectionStatus::Online));
    }

    #[test]
    fn refused_connection_shows_offline_notice() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let mut app = http_app(&rt, format!("http://127.0.0.1:{}", port));
        app.insert_text("Hello");
        app.submit();
        wait_idle(&mut app);

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.messages[0], ChatMessage::user("Hello"));
        assert_eq!(app.messages[1], ChatMessage::offline_notice());
        assert_eq!(app.status, Some(ConnectionStatus::Offline));
    }

    #[test]
    fn validation_reply_takes_the_error_path() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/ask"))
                .respond_with(
                    ResponseTemplate::new(400)
                        .set_body_json(serde_json::json!({"error": "Prompt is required"})),
                )
                .mount(&server),
        );

        let mut app = http_app(&rt, server.uri());
        app.insert_text("Hello");
        app.submit();
        wait_idle(&mut app);
        assert!(app.messages[1].is_error);
        assert_eq!(app.status, Some(ConnectionStatus::Offline));
    }

    #[test]
    fn quit_keys() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app_with(FakeBackend::answering("unused"), &rt);
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
