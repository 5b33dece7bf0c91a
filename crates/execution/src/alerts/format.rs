//! Alert text rendering (Telegram HTML).

use position_watch_domain::{Position, Snapshot};
use std::fmt::Write;
use std::time::Duration;

const MISSING: &str = "n/a";

/// Shortens an account address to `first10...last6`.
#[must_use]
pub fn short_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= 16 {
        return account.to_string();
    }

    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}

/// Escapes the characters Telegram HTML treats as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human-readable polling interval.
#[must_use]
pub fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match (secs % 60, secs / 60) {
        (0, 1) => "1 minute".to_string(),
        (0, mins) if mins > 0 => format!("{mins} minutes"),
        _ if secs == 1 => "1 second".to_string(),
        _ => format!("{secs} seconds"),
    }
}

fn opaque(value: Option<&str>) -> String {
    escape_html(value.unwrap_or(MISSING))
}

fn side_label(position: &Position) -> &'static str {
    position.side().map_or("FLAT", |s| s.as_str())
}

fn account_line(account: &str) -> String {
    format!("Account: <code>{}</code>", escape_html(&short_account(account)))
}

/// Renders one position as a list item for the startup status.
#[must_use]
pub fn position_summary(position: &Position) -> String {
    let mut out = format!(
        "• {} {}\n  Size: {}\n  Entry: ${}\n  PnL: ${}",
        escape_html(&position.instrument),
        side_label(position),
        position.size,
        opaque(position.entry_price.as_deref()),
        opaque(position.unrealized_pnl.as_deref()),
    );
    if let Some(leverage) = &position.leverage {
        let _ = write!(out, "\n  Leverage: {}x", escape_html(leverage));
    }
    out
}

/// Renders one position as a block inside a transition alert.
#[must_use]
pub fn position_block(position: &Position) -> String {
    let mut out = format!(
        "Coin: <b>{}</b>\nSide: {}\nSize: {}\nEntry: ${}\n",
        escape_html(&position.instrument),
        side_label(position),
        position.size,
        opaque(position.entry_price.as_deref()),
    );
    if let Some(leverage) = &position.leverage {
        let _ = writeln!(out, "Leverage: {}x", escape_html(leverage));
    }
    out
}

/// Renders a list of positions, or a placeholder when there are none.
#[must_use]
pub fn positions_list<'a>(positions: impl IntoIterator<Item = &'a Position>) -> String {
    let items: Vec<String> = positions.into_iter().map(position_summary).collect();
    if items.is_empty() {
        "No open positions".to_string()
    } else {
        items.join("\n")
    }
}

/// Startup alert describing the current positions.
#[must_use]
pub fn startup_status(account: &str, snapshot: &Snapshot, interval: Duration) -> String {
    if snapshot.is_empty() {
        format!(
            "⚠️ <b>Monitoring started</b>\n\n{}\nStatus: no open positions\n\n\
             Checking every {} for new positions.",
            account_line(account),
            describe_interval(interval),
        )
    } else {
        format!(
            "✅ <b>Monitoring started</b>\n\n{}\n\n<b>Current positions:</b>\n{}\n\n\
             Checking every {}.",
            account_line(account),
            positions_list(snapshot.iter()),
            describe_interval(interval),
        )
    }
}

/// Startup alert sent when the first fetch fails.
#[must_use]
pub fn startup_failure(account: &str, cause: &str) -> String {
    format!(
        "❌ <b>Monitoring failed to start</b>: could not fetch positions for <code>{}</code>\n\
         Cause: {}",
        escape_html(&short_account(account)),
        escape_html(cause),
    )
}

fn transition(header: &str, account: &str, positions: &[Position]) -> String {
    let mut out = format!("{header}\n\n");
    for position in positions {
        out.push_str(&position_block(position));
        out.push('\n');
    }
    out.push_str(&account_line(account));
    out
}

/// Alert for positions that closed since the last check.
#[must_use]
pub fn positions_closed(account: &str, positions: &[Position]) -> String {
    transition("🔴 <b>POSITION CLOSED</b>", account, positions)
}

/// Alert for positions that opened since the last check.
#[must_use]
pub fn positions_opened(account: &str, positions: &[Position]) -> String {
    transition("🟢 <b>NEW POSITION</b>", account, positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ACCOUNT: &str = "0xb317d2bc2d3d2df5fa441b5bae0ab9d8b07283ae";

    #[test]
    fn test_short_account() {
        assert_eq!(short_account(ACCOUNT), "0xb317d2bc...7283ae");
        assert_eq!(short_account("0xabc"), "0xabc");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn test_describe_interval() {
        assert_eq!(describe_interval(Duration::from_secs(900)), "15 minutes");
        assert_eq!(describe_interval(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe_interval(Duration::from_secs(90)), "90 seconds");
        assert_eq!(describe_interval(Duration::from_secs(1)), "1 second");
    }

    #[test]
    fn test_position_summary() {
        let position = Position::new("BTC", dec!(2))
            .with_entry_price("64000")
            .with_unrealized_pnl("12.5")
            .with_leverage("20");

        assert_eq!(
            position_summary(&position),
            "• BTC LONG\n  Size: 2\n  Entry: $64000\n  PnL: $12.5\n  Leverage: 20x"
        );
    }

    #[test]
    fn test_position_block_without_optional_fields() {
        let position = Position::new("ETH", dec!(-1.5));
        assert_eq!(
            position_block(&position),
            "Coin: <b>ETH</b>\nSide: SHORT\nSize: -1.5\nEntry: $n/a\n"
        );
    }

    #[test]
    fn test_startup_status_empty() {
        let text = startup_status(ACCOUNT, &Snapshot::empty(), Duration::from_secs(900));
        assert!(text.contains("Monitoring started"));
        assert!(text.contains("no open positions"));
        assert!(text.contains("15 minutes"));
        assert!(text.contains("<code>0xb317d2bc...7283ae</code>"));
    }

    #[test]
    fn test_startup_status_lists_positions() {
        let snapshot = Snapshot::from_positions(vec![
            Position::new("SOL", dec!(5)),
            Position::new("BTC", dec!(2)),
        ])
        .unwrap();

        let text = startup_status(ACCOUNT, &snapshot, Duration::from_secs(900));
        let btc = text.find("• BTC LONG").unwrap();
        let sol = text.find("• SOL LONG").unwrap();
        assert!(btc < sol);
    }

    #[test]
    fn test_transition_alerts() {
        let closed = positions_closed(ACCOUNT, &[Position::new("BTC", dec!(2))]);
        assert!(closed.starts_with("🔴 <b>POSITION CLOSED</b>"));
        assert!(closed.contains("Coin: <b>BTC</b>"));
        assert!(closed.ends_with("</code>"));

        let opened = positions_opened(ACCOUNT, &[Position::new("<X>", dec!(1))]);
        assert!(opened.starts_with("🟢 <b>NEW POSITION</b>"));
        assert!(opened.contains("Coin: <b>&lt;X&gt;</b>"));
    }

    #[test]
    fn test_startup_failure_escapes_cause() {
        let text = startup_failure(ACCOUNT, "Unexpected status 502: <html>");
        assert!(text.contains("&lt;html&gt;"));
        assert!(text.contains("Monitoring failed to start"));
    }
}
