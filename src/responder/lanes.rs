//! 会话通道
//!
//! 每个会话一条单消费者队列，由一个任务按到达顺序逐条处理；不同会话的任务在
//! 生成式调用挂起期间可以交错执行。通道跨重连复用。
//!
//! 空闲超过 `LANE_IDLE_TIMEOUT` 的任务关闭队列、处理完已排队的消息后退出，下次来消息时重建；
//! 重建的任务先等旧任务结束，保证同一会话不会并发处理。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::session::MessageSender;

use super::pipeline::MessagePipeline;

/// 通道任务的空闲退出时间
pub const LANE_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

struct LaneJob {
    text: String,
    sender: Arc<dyn MessageSender>,
}

struct Lane {
    tx: mpsc::UnboundedSender<LaneJob>,
    worker: JoinHandle<()>,
}

pub struct ConversationLanes {
    pipeline: Arc<MessagePipeline>,
    idle_timeout: Duration,
    lanes: HashMap<String, Lane>,
}

impl ConversationLanes {
    pub fn new(pipeline: Arc<MessagePipeline>) -> Self {
        Self::with_idle_timeout(pipeline, LANE_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(pipeline: Arc<MessagePipeline>, idle_timeout: Duration) -> Self {
        Self {
            pipeline,
            idle_timeout,
            lanes: HashMap::new(),
        }
    }

    pub fn pipeline(&self) -> &Arc<MessagePipeline> {
        &self.pipeline
    }

    /// 把消息排进该会话的通道；通道不存在（或处理任务已退出）时新建
    pub fn dispatch(&mut self, conversation_id: &str, text: String, sender: Arc<dyn MessageSender>) {
        let mut job = LaneJob { text, sender };
        let mut previous = None;
        if let Some(lane) = self.lanes.remove(conversation_id) {
            match lane.tx.send(job) {
                Ok(()) => {
                    self.lanes.insert(conversation_id.to_string(), lane);
                    return;
                }
                Err(mpsc::error::SendError(returned)) => {
                    job = returned;
                    previous = Some(lane.worker);
                }
            }
        }

        self.sweep_idle();
        let lane = self.spawn_lane(conversation_id.to_string(), previous);
        // 新建的接收端一定存活
        let _ = lane.tx.send(job);
        self.lanes.insert(conversation_id.to_string(), lane);
    }

    /// 移除已退出的通道
    fn sweep_idle(&mut self) {
        self.lanes
            .retain(|_, lane| !(lane.tx.is_closed() && lane.worker.is_finished()));
    }

    fn spawn_lane(&self, conversation_id: String, previous: Option<JoinHandle<()>>) -> Lane {
        let (tx, mut rx) = mpsc::unbounded_channel::<LaneJob>();
        let pipeline = Arc::clone(&self.pipeline);
        let idle_timeout = self.idle_timeout;
        let worker = tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            loop {
                let job = match tokio::time::timeout(idle_timeout, rx.recv()).await {
                    Ok(Some(job)) => job,
                    Ok(None) => break,
                    Err(_) => {
                        rx.close();
                        tracing::debug!(conversation = %conversation_id, "lane idle, closing");
                        continue;
                    }
                };
                let outcome = pipeline
                    .handle(job.sender.as_ref(), &conversation_id, &job.text)
                    .await;
                tracing::debug!(conversation = %conversation_id, ?outcome, "message handled");
            }
        });
        Lane { tx, worker }
    }

    /// 停止全部通道任务，丢弃尚未处理的消息；返回被停止的通道数
    pub fn abort_all(&mut self) -> usize {
        let count = self.active();
        for (_, lane) in self.lanes.drain() {
            lane.worker.abort();
        }
        count
    }

    /// 仍在接收消息的通道数
    pub fn active(&self) -> usize {
        self.lanes.values().filter(|lane| !lane.tx.is_closed()).count()
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}
