//! Visual projection of a business record: marker colour and popup content.

use crate::model::{BusinessRecord, Coordinates, PowerType, RecordId};

/// Marker colour, decided by payment capability first and power supply second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerColor {
    /// Accepts card payment.
    Green,
    /// Cash only, three-phase power.
    Blue,
    /// Cash only, single-phase or generator power.
    Amber,
}

impl MarkerColor {
    pub fn for_record(record: &BusinessRecord) -> Self {
        if record.accepts_card_payment {
            MarkerColor::Green
        } else if record.power_type == PowerType::ThreePhase {
            MarkerColor::Blue
        } else {
            MarkerColor::Amber
        }
    }

    pub fn css(&self) -> &'static str {
        match self {
            MarkerColor::Green => "#2e7d32",
            MarkerColor::Blue => "#1565c0",
            MarkerColor::Amber => "#ffb300",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub name: String,
    pub category: String,
    pub power_type: PowerType,
    pub accepts_card_payment: bool,
    pub photo_url: Option<String>,
}

impl Popup {
    pub fn for_record(record: &BusinessRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            power_type: record.power_type,
            accepts_card_payment: record.accepts_card_payment,
            photo_url: record.photo_url.clone(),
        }
    }

    pub fn payment_label(&self) -> &'static str {
        if self.accepts_card_payment {
            "Accepts card"
        } else {
            "Cash only"
        }
    }

    /// Popup body as an HTML fragment. Every value is escaped.
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div class=\"biz-popup\"><strong>{}</strong><div>{}</div><div>Power: {}</div><div>{}</div>",
            escape_html(&self.name),
            escape_html(&self.category),
            self.power_type.label(),
            self.payment_label(),
        );
        if let Some(url) = &self.photo_url {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" style=\"max-width:200px;margin-top:6px;\" />",
                escape_html(url),
                escape_html(&self.name),
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// Everything a surface needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub id: RecordId,
    pub position: Coordinates,
    pub color: MarkerColor,
    pub popup: Popup,
}

impl MarkerSpec {
    pub fn for_record(record: &BusinessRecord) -> Self {
        Self {
            id: record.id.clone(),
            position: record.position,
            color: MarkerColor::for_record(record),
            popup: Popup::for_record(record),
        }
    }
}

/// Replaces `&`, `<`, `>`, `"` and `'` with their HTML entities.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
