//! Mock payment authorization
//!
//! A deterministic stand-in for a payment gateway: the decision depends only on
//! the payment details, the amount and the current UTC month.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::domain::value_objects::{prefixed_id, Money};
use crate::{PizzeriaError, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CardDetails {
    #[validate(length(min = 12, max = 19))]
    pub card_number: Option<String>,
    #[validate(range(min = 1, max = 12))]
    pub exp_month: Option<u32>,
    #[validate(range(min = 2024, max = 2100))]
    pub exp_year: Option<i32>,
    #[validate(length(min = 3, max = 4))]
    pub cvv: Option<String>,
    #[validate(length(min = 3, max = 15))]
    pub zip_code: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct GiftCardDetails {
    #[validate(length(min = 4, max = 64))]
    pub code: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    Giftcard,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentInfo {
    Card(CardDetails),
    Cash,
    Giftcard(GiftCardDetails),
}

/// Wire shape of a payment: one flat object, `method` defaulting to card.
#[derive(Debug, Default, Deserialize)]
struct RawPayment {
    #[serde(default)]
    method: PaymentMethod,
    #[serde(flatten)]
    card: CardDetails,
    #[serde(flatten)]
    gift: GiftCardDetails,
}

impl TryFrom<RawPayment> for PaymentInfo {
    type Error = PizzeriaError;

    /// Every field present is format-checked, whichever method is chosen.
    fn try_from(raw: RawPayment) -> Result<Self> {
        raw.card.validate()?;
        raw.gift.validate()?;
        Ok(match raw.method {
            PaymentMethod::Card => PaymentInfo::Card(raw.card),
            PaymentMethod::Cash => PaymentInfo::Cash,
            PaymentMethod::Giftcard => PaymentInfo::Giftcard(raw.gift),
        })
    }
}

impl<'de> Deserialize<'de> for PaymentInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        PaymentInfo::try_from(RawPayment::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// Outcome of an authorization attempt. A decline is a result, not an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Authorization {
    Approved {
        auth_id: String,
        amount: Money,
        #[serde(skip_serializing_if = "Option::is_none")]
        card_last4: Option<String>,
    },
    Declined { reason: String },
}

impl Authorization {
    pub fn is_approved(&self) -> bool { matches!(self, Authorization::Approved { .. }) }

    pub fn decline_reason(&self) -> Option<&str> {
        match self {
            Authorization::Declined { reason } => Some(reason.as_str()),
            Authorization::Approved { .. } => None,
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

struct CardTerms<'a> {
    number: &'a str,
    exp_month: u32,
    exp_year: i32,
}

impl CardDetails {
    fn require(&self) -> Result<CardTerms<'_>> {
        let number = present(&self.card_number);
        let mut missing = Vec::new();
        if number.is_none() { missing.push("card_number"); }
        if self.exp_month.is_none() { missing.push("exp_month"); }
        if self.exp_year.is_none() { missing.push("exp_year"); }
        if present(&self.cvv).is_none() { missing.push("cvv"); }
        if present(&self.zip_code).is_none() { missing.push("zip_code"); }
        match (number, self.exp_month, self.exp_year) {
            (Some(number), Some(exp_month), Some(exp_year)) if missing.is_empty() => {
                Ok(CardTerms { number, exp_month, exp_year })
            }
            _ => Err(PizzeriaError::MissingPaymentFields(missing.into_iter().map(String::from).collect())),
        }
    }

    fn digits(number: &str) -> String { number.chars().filter(char::is_ascii_digit).collect() }
}

impl PaymentInfo {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentInfo::Card(_) => PaymentMethod::Card,
            PaymentInfo::Cash => PaymentMethod::Cash,
            PaymentInfo::Giftcard(_) => PaymentMethod::Giftcard,
        }
    }

    /// Required-field presence first, then field formats.
    pub fn check(&self) -> Result<()> {
        match self {
            PaymentInfo::Card(card) => {
                card.require()?;
                card.validate()?;
            }
            PaymentInfo::Giftcard(gift) => {
                if present(&gift.code).is_none() { return Err(PizzeriaError::MissingGiftCardCode); }
                gift.validate()?;
            }
            PaymentInfo::Cash => {}
        }
        Ok(())
    }
}

pub fn decide_cash(amount: Money) -> Authorization {
    Authorization::Approved { auth_id: "cash".to_string(), amount, card_last4: None }
}

pub fn decide_giftcard(code: &str, amount: Money) -> Authorization {
    if code.trim().eq_ignore_ascii_case("DECLINE") {
        return Authorization::Declined { reason: "Mock gift card declined".to_string() };
    }
    Authorization::Approved { auth_id: prefixed_id("gift", 10), amount, card_last4: None }
}

/// The expiry month itself is still valid.
pub fn decide_card(number: &str, exp_month: u32, exp_year: i32, amount: Money, now: DateTime<Utc>) -> Authorization {
    if (exp_year, exp_month) < (now.year(), now.month()) {
        return Authorization::Declined { reason: "Card expired".to_string() };
    }
    let digits = CardDetails::digits(number);
    if digits.ends_with("0000") {
        return Authorization::Declined { reason: "Mock decline rule (ends with 0000)".to_string() };
    }
    let card_last4 = if digits.len() >= 4 { digits[digits.len() - 4..].to_string() } else { "????".to_string() };
    Authorization::Approved { auth_id: prefixed_id("auth", 12), amount, card_last4: Some(card_last4) }
}

pub fn authorize(payment: &PaymentInfo, amount: Money) -> Result<Authorization> {
    authorize_at(payment, amount, Utc::now())
}

pub fn authorize_at(payment: &PaymentInfo, amount: Money, now: DateTime<Utc>) -> Result<Authorization> {
    payment.check()?;
    let decision = match payment {
        PaymentInfo::Cash => decide_cash(amount),
        PaymentInfo::Giftcard(gift) => decide_giftcard(present(&gift.code).unwrap_or_default(), amount),
        PaymentInfo::Card(card) => {
            let terms = card.require()?;
            decide_card(terms.number, terms.exp_month, terms.exp_year, amount, now)
        }
    };
    Ok(decision)
}
