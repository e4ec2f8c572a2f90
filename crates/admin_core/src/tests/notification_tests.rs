use super::*;

use crate::events::EVENT_CHANNEL_CAPACITY;

fn queue() -> (NotificationQueue, broadcast::Receiver<ControllerEvent>) {
    let (events, rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    (NotificationQueue::new(events), rx)
}

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn message_clears_after_ttl() {
    let (queue, _rx) = queue();
    queue.success("Division added").await;
    assert_eq!(
        queue.current().await,
        Notification {
            kind: NotificationKind::Success,
            text: "Division added".into(),
        }
    );

    tokio::time::sleep(Duration::from_millis(2400)).await;
    settle().await;
    assert_eq!(queue.current().await.text, "Division added");

    tokio::time::sleep(Duration::from_millis(200)).await;
    settle().await;
    assert!(queue.current().await.is_idle());
    assert_eq!(queue.current().await.text, "");
}

#[tokio::test(start_paused = true)]
async fn second_message_supersedes_first_and_restarts_timer() {
    let (queue, _rx) = queue();
    queue.success("first").await;

    tokio::time::sleep(Duration::from_millis(1000)).await;
    queue.error("second").await;

    // Past the first message's original expiry.
    tokio::time::sleep(Duration::from_millis(1600)).await;
    settle().await;
    let current = queue.current().await;
    assert_eq!(current.kind, NotificationKind::Error);
    assert_eq!(current.text, "second");

    // 2500ms after the second call.
    tokio::time::sleep(Duration::from_millis(1000)).await;
    settle().await;
    assert!(queue.current().await.is_idle());
}

#[tokio::test(start_paused = true)]
async fn independent_queues_keep_their_own_timers() {
    let (left, _left_rx) = queue();
    let (right, _right_rx) = queue();

    left.success("left").await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    right.success("right").await;
    left.success("left again").await;

    tokio::time::sleep(Duration::from_millis(1000)).await;
    settle().await;
    assert_eq!(left.current().await.text, "left again");
    assert_eq!(right.current().await.text, "right");

    tokio::time::sleep(Duration::from_millis(1600)).await;
    settle().await;
    assert!(left.current().await.is_idle());
    assert!(right.current().await.is_idle());
}

#[tokio::test(start_paused = true)]
async fn publishes_show_and_expiry_events() {
    let (queue, mut rx) = queue();
    queue.error("Error loading subjects").await;

    tokio::time::sleep(NOTIFICATION_TTL + Duration::from_millis(10)).await;
    settle().await;

    let shown = rx.recv().await.expect("shown");
    assert_eq!(
        shown,
        ControllerEvent::NotificationChanged(Notification {
            kind: NotificationKind::Error,
            text: "Error loading subjects".into(),
        })
    );
    let cleared = rx.recv().await.expect("cleared");
    assert_eq!(
        cleared,
        ControllerEvent::NotificationChanged(Notification::default())
    );
}

#[tokio::test(start_paused = true)]
async fn dismiss_cancels_pending_expiry() {
    let (queue, _rx) = queue();
    queue.success("Settings updated").await;
    queue.dismiss().await;
    assert!(queue.current().await.is_idle());

    queue.success("again").await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    settle().await;
    assert_eq!(queue.current().await.text, "again");
}
