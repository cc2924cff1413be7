//! CSV export of ledger entries.

use serde::Serialize;

use crate::domain::trade::LedgerEntry;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRow<'a> {
    id: &'a str,
    timestamp: &'a str,
    action: &'a str,
    from_token: &'a str,
    to_token: &'a str,
    amount: f64,
    fee: Option<f64>,
    reason: &'a str,
}

impl<'a> From<&'a LedgerEntry> for ExportRow<'a> {
    fn from(entry: &'a LedgerEntry) -> Self {
        match entry {
            LedgerEntry::Trade(trade) => Self {
                id: &trade.id,
                timestamp: &trade.timestamp,
                action: trade.action.as_str(),
                from_token: &trade.from_token,
                to_token: &trade.to_token,
                amount: trade.amount,
                fee: Some(trade.fee),
                reason: &trade.reason,
            },
            LedgerEntry::Bridge(transfer) => Self {
                id: &transfer.id,
                timestamp: &transfer.timestamp,
                action: "bridge",
                from_token: &transfer.token,
                to_token: &transfer.token,
                amount: transfer.amount,
                fee: None,
                reason: "",
            },
        }
    }
}

/// Render entries as CSV with an
/// `id,timestamp,action,fromToken,toToken,amount,fee,reason` header.
///
/// # Errors
/// Returns error if a row can't be written.
pub fn entries_to_csv(entries: &[LedgerEntry]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if entries.is_empty() {
        writer.write_record([
            "id", "timestamp", "action", "fromToken", "toToken", "amount", "fee", "reason",
        ])?;
    }
    for entry in entries {
        writer.serialize(ExportRow::from(entry))?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
