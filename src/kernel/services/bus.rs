//! 预览桥接通道
//!
//! 单向：生产端在沙箱一侧（预览宿主持有 [`BridgeSender`]），消费端在宿主一侧
//! （Store 持有 [`BridgeReceiver`]）。每次运行新建一对端点；停止运行时丢弃接收端，
//! 之后的发送全部失败并被丢弃。消息按发送顺序送达。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "log")]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// 沙箱发回的结构化消息：`{source, severity, text}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    #[serde(rename = "source")]
    pub origin: String,
    pub severity: Severity,
    pub text: String,
}

impl BridgeMessage {
    pub fn new(origin: impl Into<String>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            severity,
            text: text.into(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone)]
pub struct BridgeEnvelope {
    pub run: RunId,
    pub message: BridgeMessage,
}

#[derive(Debug, Clone)]
pub struct BridgeSender {
    run: RunId,
    tx: Sender<BridgeEnvelope>,
}

#[derive(Debug)]
pub struct BridgeReceiver {
    run: RunId,
    rx: Receiver<BridgeEnvelope>,
}

pub fn preview_bridge(run: RunId) -> (BridgeSender, BridgeReceiver) {
    let (tx, rx) = mpsc::channel();
    (BridgeSender { run, tx }, BridgeReceiver { run, rx })
}

impl BridgeSender {
    pub fn run(&self) -> RunId {
        self.run
    }

    /// 接收端已丢弃（运行已停止）时返回 false
    pub fn send(&self, message: BridgeMessage) -> bool {
        self.tx
            .send(BridgeEnvelope {
                run: self.run,
                message,
            })
            .is_ok()
    }

    /// 转发沙箱 `postMessage` 的原始 JSON；无法解析的消息被忽略
    pub fn post_json(&self, raw: &str) -> bool {
        match BridgeMessage::from_json(raw) {
            Ok(message) => self.send(message),
            Err(e) => {
                tracing::debug!(run = %self.run, error = %e, "ignoring malformed bridge message");
                false
            }
        }
    }
}

impl BridgeReceiver {
    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn try_recv(&mut self) -> Result<BridgeEnvelope, TryRecvError> {
        self.rx.try_recv()
    }

    /// 取出当前所有待处理消息（不阻塞）
    pub fn drain(&mut self) -> Vec<BridgeEnvelope> {
        let mut out = Vec::new();
        while let Ok(envelope) = self.rx.try_recv() {
            if envelope.run == self.run {
                out.push(envelope);
            }
        }
        out
    }
}
