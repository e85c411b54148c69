//! Discord embed layout for a condor report.

use condor_range::CondorReport;
use serde::{Deserialize, Serialize};

/// Zero-width space; Discord rejects empty field values.
pub const BLANK: &str = "\u{200b}";

/// Date format shown to readers (e.g. `24-Oct-2024`).
pub const DISPLAY_DATE_FORMAT: &str = "%d-%b-%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }

    /// Full-width heading with no body.
    pub fn separator(name: impl Into<String>) -> Self {
        Self::block(name, BLANK)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

/// Body of a webhook execute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub embeds: Vec<Embed>,
}

/// Presentation settings for the embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedStyle {
    pub color: u32,
    pub footer: String,
}

impl Default for EmbedStyle {
    fn default() -> Self {
        Self {
            color: 5_814_783,
            footer: "Generated by condor".to_string(),
        }
    }
}

/// Lays out a report as a single embed.
#[must_use]
pub fn build_embed(report: &CondorReport, style: &EmbedStyle) -> Embed {
    let plan = &report.plan;
    let inner = &plan.inner;
    let days = report.trading_days();
    let band = report.band_label();
    let multiplier = inner.sd_multiplier;
    let today = report.as_of.format(DISPLAY_DATE_FORMAT).to_string();

    let mut fields = vec![
        EmbedField::inline("**INSTRUMENT**", report.symbol.as_str()),
        EmbedField::inline("**EXPIRY DATE**", report.expiry.format(DISPLAY_DATE_FORMAT).to_string()),
        EmbedField::inline("**CURRENT DATE**", today.clone()),
        EmbedField::inline("**TIME TO EXPIRY**", format!("{days} trading days")),
        EmbedField::inline("**NEAREST STRIKE**", report.atm_strike.to_string()),
        EmbedField::inline("**LAST TRADED PRICE**", report.last_price.to_string()),
        EmbedField::separator(format!(
            "**{multiplier} STANDARD DEVIATION ({band}) CALCULATION RESULTS**"
        )),
        EmbedField::inline("CIV", format!("{:.2}%", inner.cumulative_iv)),
        EmbedField::inline("DV", format!("{:.2}%", inner.daily_volatility)),
        EmbedField::inline("MV", format!("{:.2}% for {days} days", inner.period_volatility)),
        EmbedField::inline(format!("LOWER {band}"), format!("{:.2}", inner.lower_bound)),
        EmbedField::inline(format!("UPPER {band}"), format!("{:.2}", inner.upper_bound)),
    ];

    if let Some(outer) = &plan.outer {
        let outer_band = format!("{}SD", outer.sd_multiplier);
        fields.push(EmbedField::inline(
            format!("LOWER {outer_band}"),
            format!("{:.2}", outer.lower_bound),
        ));
        fields.push(EmbedField::inline(
            format!("UPPER {outer_band}"),
            format!("{:.2}", outer.upper_bound),
        ));
    }

    fields.push(EmbedField::separator("**IRON CONDOR STRATEGY LEGS**"));
    fields.extend(
        report
            .leg_lines()
            .into_iter()
            .map(|(action, contract)| EmbedField::block(action, contract)),
    );

    Embed {
        title: format!("{} Option Chain Analysis", report.symbol),
        description: format!("Data fetched on {today}"),
        color: style.color,
        fields,
        footer: Some(EmbedFooter {
            text: style.footer.clone(),
        }),
    }
}
