//! System notifications via freedesktop D-Bus.

use std::collections::HashMap;
use zbus::{Connection, proxy};

/// D-Bus interface for freedesktop Notifications.
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    /// Send a notification.
    ///
    /// # Arguments
    /// * `app_name` - Application name
    /// * `replaces_id` - ID of notification to replace (0 for new)
    /// * `app_icon` - Icon name or path
    /// * `summary` - Notification title
    /// * `body` - Notification body text
    /// * `actions` - List of action identifiers and labels
    /// * `hints` - Additional metadata
    /// * `expire_timeout` - Timeout in milliseconds (-1 for default)
    ///
    /// # Returns
    /// Notification ID
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Send a system notification.
///
/// # Arguments
/// * `summary` - Notification title
/// * `body` - Notification body text
/// * `icon` - Optional icon name (defaults to "dialog-error")
pub async fn send_notification(summary: &str, body: &str, icon: Option<&str>) -> Result<(), String> {
    let connection = Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session bus: {}", e))?;

    let proxy = NotificationsProxy::new(&connection)
        .await
        .map_err(|e| format!("Failed to create notifications proxy: {}", e))?;

    let icon = icon.unwrap_or("dialog-error");
    let hints = HashMap::new();

    proxy
        .notify(
            "RasterLayer",
            0,
            icon,
            summary,
            body,
            vec![],
            hints,
            -1, // server default timeout
        )
        .await
        .map_err(|e| format!("Failed to send notification: {}", e))?;

    Ok(())
}

/// Send a notification and wait for the bus to accept it.
///
/// Runs on a throwaway current-thread runtime; any failure is logged and
/// otherwise ignored.
pub fn send_notification_blocking(summary: &str, body: &str) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::warn!("Failed to start notification runtime: {}", e);
            return;
        }
    };

    let sent = runtime.block_on(async {
        tokio::time::timeout(
            std::time::Duration::from_secs(3),
            send_notification(summary, body, None),
        )
        .await
        .unwrap_or_else(|_| Err("Timed out waiting for the notification service".to_string()))
    });

    if let Err(e) = sent {
        log::warn!("Failed to send notification: {}", e);
    }
}
