use super::SubscriberEmail;

/// Where a subscriber came from. Empty values are dropped so they never
/// reach the outbound payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub referring_site: Option<String>,
}

impl Attribution {
    pub fn new(
        utm_source: Option<String>,
        utm_medium: Option<String>,
        referring_site: Option<String>,
    ) -> Self {
        Self {
            utm_source: non_empty(utm_source),
            utm_medium: non_empty(utm_medium),
            referring_site: non_empty(referring_site),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub email: SubscriberEmail,
    pub attribution: Attribution,
}

impl NewSubscription {
    pub fn parse(email: String, attribution: Attribution) -> Result<Self, String> {
        let email = SubscriberEmail::parse(email)?;
        Ok(Self { email, attribution })
    }
}
