use chrono::{DateTime, Utc};

/// A payload paired with an absolute expiration instant. `None` means the
/// value never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiring<T> {
    value: T,
    expires_at: Option<DateTime<Utc>>,
}

impl<T> Expiring<T> {
    pub fn new(value: T, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { value, expires_at }
    }

    pub fn never(value: T) -> Self {
        Self::new(value, None)
    }

    pub fn until(value: T, expires_at: DateTime<Utc>) -> Self {
        Self::new(value, Some(expires_at))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn never_expires() {
        let value = Expiring::never(7);
        assert!(!value.is_expired(Utc::now() + Duration::days(365 * 100)));
    }

    #[test]
    fn expires_at_the_instant() {
        let now = Utc::now();
        let value = Expiring::until(7, now);
        assert!(value.is_expired(now));
        assert!(!value.is_expired(now - Duration::seconds(1)));
    }
}
