use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

/// Single-slot banner; a new notice replaces the current one.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn post(&mut self, kind: NoticeKind, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            kind,
            message: message.into(),
            expires_at: now + NOTICE_TTL,
        });
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.post(NoticeKind::Success, message, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.post(NoticeKind::Error, message, now);
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|notice| notice.expires_at)
    }

    /// Drops the notice once it expired. Returns `true` if one was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self
            .current
            .as_ref()
            .is_some_and(|notice| notice.expires_at <= now)
        {
            self.current = None;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_ttl() {
        let now = Instant::now();
        let mut board = NoticeBoard::default();
        board.error("Gagal memuat data", now);

        assert!(!board.expire(now + Duration::from_millis(4999)));
        assert!(board.expire(now + NOTICE_TTL));
        assert!(board.current().is_none());
    }

    #[test]
    fn newer_notice_replaces_older_one() {
        let now = Instant::now();
        let mut board = NoticeBoard::default();
        board.error("Gagal memuat data", now);
        board.success("Data berhasil dihapus", now + Duration::from_secs(1));

        let notice = board.current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.expires_at, now + Duration::from_secs(6));
    }
}
