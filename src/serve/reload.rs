//! WebSocket hub for live reload.
//!
//! The dev server injects a small client script into served HTML; the
//! hub accepts those connections and broadcasts a reload message after
//! each successful watch rebuild. Dead connections are pruned at
//! broadcast time.

use anyhow::{Result, anyhow};
use parking_lot::Mutex;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use tungstenite::{Message, WebSocket};

/// Maximum port retry attempts when the base port is taken.
const MAX_PORT_RETRIES: u16 = 10;

pub struct ReloadHub {
    port: u16,
    clients: Mutex<Vec<WebSocket<TcpStream>>>,
}

impl ReloadHub {
    /// Bind the WebSocket listener and spawn the acceptor thread.
    pub fn start(base_port: u16) -> Result<Arc<Self>> {
        let (listener, port) = bind_first_free(base_port, MAX_PORT_RETRIES)?;
        crate::debug!("reload"; "ws://localhost:{port}");

        let hub = Arc::new(Self {
            port,
            clients: Mutex::new(Vec::new()),
        });

        let acceptor = Arc::clone(&hub);
        std::thread::spawn(move || acceptor.accept_loop(listener));
        Ok(hub)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn accept_loop(&self, listener: TcpListener) {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => match tungstenite::accept(stream) {
                    Ok(socket) => {
                        crate::debug!("reload"; "client connected");
                        self.clients.lock().push(socket);
                    }
                    Err(err) => crate::debug!("reload"; "handshake failed: {err}"),
                },
                Err(err) => {
                    crate::log!("reload"; "accept error: {err}");
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
        }
    }

    /// Broadcast one reload message to every connected client.
    pub fn notify_reload(&self) {
        let mut clients = self.clients.lock();
        clients.retain_mut(|socket| socket.send(Message::text("reload")).is_ok());
        crate::debug!("reload"; "notified {} client(s)", clients.len());
    }
}

/// Bind the first free port in a short window above `base_port`.
fn bind_first_free(base_port: u16, attempts: u16) -> Result<(TcpListener, u16)> {
    let end = base_port.saturating_add(attempts);
    for port in base_port..end {
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
            let port = listener.local_addr()?.port();
            return Ok((listener, port));
        }
    }
    Err(anyhow!("reload socket ports {base_port}-{} all in use", end - 1))
}
