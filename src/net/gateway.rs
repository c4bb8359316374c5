use crate::net::protocol::{EVENT_LOGIN, EVENT_SIGNUP, Inbound, LoginRequest, Reply, SignupRequest};
use crate::services::AuthService;

/// Handles one inbound text frame and produces the reply to send back, if any.
///
/// Events without an `ack` are still executed but get no reply. Frames that cannot be
/// understood always get an error reply, echoing the `ack` when it could be read.
pub async fn dispatch(text: &str, auth: &AuthService) -> Option<Reply> {
    let inbound: Inbound = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "malformed frame");
            return Some(Reply::error(None, format!("malformed frame: {e}")));
        }
    };
    let ack = inbound.ack;

    let result = match inbound.event.as_str() {
        EVENT_SIGNUP => {
            let req: SignupRequest = match serde_json::from_value(inbound.data) {
                Ok(v) => v,
                Err(e) => return Some(Reply::error(ack, format!("invalid signup payload: {e}"))),
            };
            tracing::debug!(username = %req.username, "signup event");
            auth.create_account(&req.username, &req.email, &req.password).await
        }
        EVENT_LOGIN => {
            let req: LoginRequest = match serde_json::from_value(inbound.data) {
                Ok(v) => v,
                Err(e) => return Some(Reply::error(ack, format!("invalid login payload: {e}"))),
            };
            tracing::debug!(username = %req.username, "login event");
            auth.valid_login(&req.username, &req.password).await
        }
        other => {
            tracing::debug!(event = %other, "unknown event");
            return Some(Reply::error(ack, format!("unknown event: {other}")));
        }
    };

    ack.map(|ack| Reply::result(Some(ack), result))
}
