use actix_web::HttpRequest;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address for the event log: first hop of `X-Forwarded-For`,
/// else the peer address, else `"unknown"`.
pub fn client_ip(req: &HttpRequest) -> String {
    let forwarded = req
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(first_hop);

    match forwarded {
        Some(ip) => ip,
        None => req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

fn first_hop(header: &str) -> Option<String> {
    let hop = header.split(',').next()?.trim();
    if hop.is_empty() {
        None
    } else {
        Some(hop.to_string())
    }
}
