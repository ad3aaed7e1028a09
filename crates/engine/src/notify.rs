#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A dismissible user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    notices: Vec<Notice>,
}

impl Notifications {
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.notices.push(Notice {
            id: self.next_id,
            level,
            message: message.into(),
        });
        self.next_id
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(NoticeLevel::Info, message)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| n.level == NoticeLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_removes_only_that_notice() {
        let mut n = Notifications::default();
        let a = n.error("save failed");
        let b = n.info("layout applied");
        assert!(n.dismiss(a));
        assert!(!n.dismiss(a));
        assert_eq!(n.notices().len(), 1);
        assert_eq!(n.notices()[0].id, b);
        assert_eq!(n.errors().count(), 0);
    }
}
