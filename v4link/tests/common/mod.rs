//! In-process device emulator for link tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use v4link::{Frame, ResponseStatus, Transport};
use v4link_transport::{Error, Result};

/// How the device answers one request
#[derive(Debug, Clone)]
pub enum Reply {
    /// Well-formed status frame
    Status(ResponseStatus),

    /// Arbitrary bytes, delivered in one read
    Raw(Vec<u8>),

    /// Bytes delivered one read per chunk
    Chunked(Vec<Vec<u8>>),

    /// Nothing at all
    Silent,
}

#[derive(Debug, Default)]
struct DeviceState {
    replies: VecDeque<Reply>,
    requests: Vec<Frame>,
    connects: usize,
    disconnects: usize,
    discards: usize,
}

/// Observer kept by the test after the device moves into a session
#[derive(Debug, Clone)]
pub struct Probe(Arc<Mutex<DeviceState>>);

impl Probe {
    pub fn requests(&self) -> Vec<Frame> {
        self.0.lock().unwrap().requests.clone()
    }

    pub fn connects(&self) -> usize {
        self.0.lock().unwrap().connects
    }

    pub fn disconnects(&self) -> usize {
        self.0.lock().unwrap().disconnects
    }

    pub fn discards(&self) -> usize {
        self.0.lock().unwrap().discards
    }

    pub fn queue(&self, reply: Reply) {
        self.0.lock().unwrap().replies.push_back(reply);
    }
}

/// Transport that behaves like a device running the V4-link firmware
pub struct FakeDevice {
    state: Arc<Mutex<DeviceState>>,
    outbox: VecDeque<Vec<u8>>,
    connected: bool,
}

impl FakeDevice {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> (Self, Probe) {
        let state = Arc::new(Mutex::new(DeviceState {
            replies: replies.into_iter().collect(),
            ..DeviceState::default()
        }));

        let device = Self {
            state: state.clone(),
            outbox: VecDeque::new(),
            connected: false,
        };

        (device, Probe(state))
    }
}

#[async_trait]
impl Transport for FakeDevice {
    async fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Err(Error::AlreadyConnected);
        }
        self.connected = true;
        self.state.lock().unwrap().connects += 1;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.connected = false;
        self.state.lock().unwrap().disconnects += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        let mut state = self.state.lock().unwrap();

        let reply = match Frame::decode(data) {
            Ok(frame) => {
                state.requests.push(frame);
                state.replies.pop_front().unwrap_or(Reply::Silent)
            }
            Err(_) => Reply::Status(ResponseStatus::InvalidFrame),
        };

        match reply {
            Reply::Status(status) => self.outbox.push_back(Frame::encode_status(status).to_vec()),
            Reply::Raw(bytes) => self.outbox.push_back(bytes),
            Reply::Chunked(chunks) => self.outbox.extend(chunks),
            Reply::Silent => {}
        }

        Ok(())
    }

    async fn receive(&mut self, timeout: Duration) -> Result<BytesMut> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        match self.outbox.pop_front() {
            Some(chunk) => Ok(BytesMut::from(chunk.as_slice())),
            None => {
                tokio::time::sleep(timeout).await;
                Err(Error::ReadTimeout)
            }
        }
    }

    async fn discard_input(&mut self) -> Result<()> {
        self.outbox.clear();
        self.state.lock().unwrap().discards += 1;
        Ok(())
    }

    fn remote_addr(&self) -> String {
        "fake-device".into()
    }
}
