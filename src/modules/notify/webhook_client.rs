use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::core::config::WebhookConfig;

/// Summary of a newly submitted application, as carried by the webhook
#[derive(Debug, Clone)]
pub struct PengajuanNotification {
    pub id: Uuid,
    pub nama_koperasi: String,
    pub nama_ketua: String,
    pub email_ketua: String,
    pub no_hp_ketua: String,
    pub alamat_lengkap: String,
    pub kecamatan: String,
    pub jumlah_anggota: i32,
}

/// Client for the external notification webhook.
///
/// Posts a Discord-style embed for every accepted application. Delivery is
/// best-effort: failures are logged and never affect the submission that
/// triggered them. With no URL configured the client is a no-op.
pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<String>,
    username: String,
}

impl WebhookClient {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url,
            username: config.username,
        }
    }

    /// Whether a webhook URL is configured
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    /// Build the embed payload for a new application
    fn build_payload(&self, n: &PengajuanNotification) -> Value {
        json!({
            "username": self.username,
            "embeds": [{
                "title": "PENGAJUAN KOPERASI BARU",
                "description": format!(
                    "Pengajuan koperasi baru telah diterima dari **{}**",
                    n.nama_ketua
                ),
                "color": 3447003,
                "fields": [
                    { "name": "Nama Koperasi", "value": n.nama_koperasi, "inline": false },
                    { "name": "Ketua Koperasi", "value": n.nama_ketua, "inline": true },
                    { "name": "Telepon", "value": n.no_hp_ketua, "inline": true },
                    { "name": "Email", "value": n.email_ketua, "inline": false },
                    {
                        "name": "Lokasi",
                        "value": format!("{}\nKecamatan: {}", n.alamat_lengkap, n.kecamatan),
                        "inline": false
                    },
                    {
                        "name": "Jumlah Anggota",
                        "value": format!("{} orang", n.jumlah_anggota),
                        "inline": true
                    }
                ],
                "footer": {
                    "text": format!("ID Pengajuan: {} | Dinas Koperasi Kota Bogor", n.id)
                },
                "timestamp": Utc::now().to_rfc3339()
            }]
        })
    }

    /// Post the notification; the response is ignored beyond logging
    pub async fn notify_new_pengajuan(&self, notification: PengajuanNotification) {
        let Some(url) = self.url.as_deref() else {
            tracing::debug!("Notification webhook not configured, skipping");
            return;
        };

        let payload = self.build_payload(&notification);

        match self.client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    "Notification webhook delivered for pengajuan {}",
                    notification.id
                );
            }
            Ok(response) => {
                tracing::warn!(
                    "Notification webhook returned status {} for pengajuan {}",
                    response.status(),
                    notification.id
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Notification webhook failed for pengajuan {}: {}",
                    notification.id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notification() -> PengajuanNotification {
        PengajuanNotification {
            id: Uuid::new_v4(),
            nama_koperasi: "Koperasi Sejahtera".to_string(),
            nama_ketua: "Budi Santoso".to_string(),
            email_ketua: "budi@example.com".to_string(),
            no_hp_ketua: "081234567890".to_string(),
            alamat_lengkap: "Jl. Pajajaran No. 1".to_string(),
            kecamatan: "Bogor Utara".to_string(),
            jumlah_anggota: 25,
        }
    }

    #[test]
    fn test_payload_carries_summary_and_record_id() {
        let client = WebhookClient::new(WebhookConfig {
            url: Some("https://hooks.example.id/warta".to_string()),
            username: "Sistem Pengajuan Koperasi".to_string(),
        });
        let n = sample_notification();
        let payload = client.build_payload(&n);

        assert_eq!(payload["username"], "Sistem Pengajuan Koperasi");
        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "PENGAJUAN KOPERASI BARU");
        assert_eq!(embed["fields"][0]["value"], "Koperasi Sejahtera");
        assert_eq!(embed["fields"][5]["value"], "25 orang");
        assert!(embed["footer"]["text"]
            .as_str()
            .unwrap()
            .contains(&n.id.to_string()));
    }

    #[test]
    fn test_unconfigured_webhook_is_noop() {
        let client = WebhookClient::new(WebhookConfig {
            url: None,
            username: "Sistem Pengajuan Koperasi".to_string(),
        });
        assert!(!client.is_enabled());
        // Must not attempt any network call
        tokio_test::block_on(client.notify_new_pengajuan(sample_notification()));
    }
}
