use crate::call::Call;
use crate::execute::Execute;
use crate::models::{HostedLink, HostedLinkRequest};

/// Hosted authentication links.
pub struct Hosted<'a, E> {
    exec: &'a E,
}

impl<'a, E: Execute> Hosted<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    /// Create a URL that sends the end user through the hosted
    /// connect/reconnect flow.
    pub fn link(&self, request: &HostedLinkRequest) -> E::Output<HostedLink> {
        self.exec
            .execute(Call::post("hosted/accounts/link").json(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::describe::Describe;
    use time::macros::datetime;

    #[test]
    fn link_renders_expiry() {
        let request = HostedLinkRequest::new("https://api.example", datetime!(2030-06-01 12:00 UTC))
            .name("user-1");
        let call = Hosted::new(&Describe).link(&request);
        assert_eq!(call.path(), "hosted/accounts/link");
        let body = call.body().unwrap();
        assert_eq!(body["expiresOn"], "2030-06-01T12:00:00.000Z");
        assert_eq!(body["name"], "user-1");
    }
}
