use crate::error::{BackendError, CheckoutError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies a single payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh order id of the form `ORD-<32 hex digits>`.
    pub fn generate() -> Self {
        Self(format!(
            "ORD-{}",
            uuid::Uuid::new_v4().simple().to_string().to_uppercase()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A strictly positive payment amount with at most two decimal places, so the
/// amount the backend signs is exactly the amount the gateway charges.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const MAX_SCALE: u32 = 2;

    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value <= Decimal::ZERO {
            return Err(CheckoutError::InvalidRequest(
                "amount must be positive".to_string(),
            ));
        }
        if value.scale() > Self::MAX_SCALE {
            return Err(CheckoutError::InvalidRequest(format!(
                "amount {value} has more than {} decimal places",
                Self::MAX_SCALE
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PayerType {
    Sponsor,
    Volunteer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Sponsorship,
    Donation,
}

impl TransactionType {
    fn label(&self) -> &'static str {
        match self {
            TransactionType::Sponsorship => "Sponsorship",
            TransactionType::Donation => "Donation",
        }
    }
}

/// Authoritative status of a payment as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl FromStr for PayerType {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPONSOR" => Ok(PayerType::Sponsor),
            "VOLUNTEER" => Ok(PayerType::Volunteer),
            other => Err(CheckoutError::InvalidRequest(format!(
                "unknown payer type '{other}'"
            ))),
        }
    }
}

impl FromStr for TransactionType {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPONSORSHIP" => Ok(TransactionType::Sponsorship),
            "DONATION" => Ok(TransactionType::Donation),
            other => Err(CheckoutError::InvalidRequest(format!(
                "unknown transaction type '{other}'"
            ))),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "SUCCESS" => Ok(TransactionStatus::Success),
            "FAILED" => Ok(TransactionStatus::Failed),
            other => Err(BackendError::Malformed(format!(
                "unknown transaction status '{other}'"
            ))),
        }
    }
}

/// Optional payer contact fields forwarded to the backend and the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// An immutable payment intent for one checkout attempt.
///
/// Fields are only readable; build one with [`TransactionRequest::builder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    order_id: OrderId,
    amount: Amount,
    currency: String,
    payer_type: PayerType,
    payer_id: String,
    event_id: String,
    transaction_type: TransactionType,
    #[serde(flatten)]
    contact: ContactDetails,
    is_anonymous: bool,
}

impl TransactionRequest {
    pub fn builder(order_id: OrderId) -> TransactionRequestBuilder {
        TransactionRequestBuilder::new(order_id)
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn payer_type(&self) -> PayerType {
        self.payer_type
    }

    pub fn payer_id(&self) -> &str {
        &self.payer_id
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    /// Line-item text shown by the gateway, e.g. `Donation for event EV-7`.
    pub fn item_description(&self) -> String {
        format!(
            "{} for event {}",
            self.transaction_type.label(),
            self.event_id
        )
    }
}

#[derive(Debug)]
pub struct TransactionRequestBuilder {
    order_id: OrderId,
    amount: Option<Decimal>,
    currency: String,
    payer: Option<(PayerType, String)>,
    event_id: Option<String>,
    transaction_type: TransactionType,
    contact: ContactDetails,
    is_anonymous: bool,
}

impl TransactionRequestBuilder {
    fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            amount: None,
            currency: "LKR".to_string(),
            payer: None,
            event_id: None,
            transaction_type: TransactionType::Sponsorship,
            contact: ContactDetails::default(),
            is_anonymous: false,
        }
    }

    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn payer(mut self, payer_type: PayerType, payer_id: impl Into<String>) -> Self {
        self.payer = Some((payer_type, payer_id.into()));
        self
    }

    pub fn event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn contact(mut self, contact: ContactDetails) -> Self {
        self.contact = contact;
        self
    }

    pub fn anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    pub fn build(self) -> Result<TransactionRequest, CheckoutError> {
        let missing = |field: &str| CheckoutError::InvalidRequest(format!("missing {field}"));

        let amount = Amount::new(self.amount.ok_or_else(|| missing("amount"))?)?;
        let (payer_type, payer_id) = self.payer.ok_or_else(|| missing("payer"))?;
        let event_id = self.event_id.ok_or_else(|| missing("event id"))?;

        Ok(TransactionRequest {
            order_id: self.order_id,
            amount,
            currency: self.currency,
            payer_type,
            payer_id,
            event_id,
            transaction_type: self.transaction_type,
            contact: self.contact,
            is_anonymous: self.is_anonymous,
        })
    }
}

/// Raw `{hash, merchantId}` body returned by the create-payment endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedPayment {
    pub hash: String,
    pub merchant_id: String,
}

/// A signed payment bound to exactly one order.
///
/// Deliberately not `Clone`: handing it to the gateway consumes it.
#[derive(Debug, PartialEq)]
pub struct SignedPaymentDescriptor {
    order_id: OrderId,
    hash: String,
    merchant_id: String,
}

impl SignedPaymentDescriptor {
    pub fn bind(order_id: OrderId, signed: SignedPayment) -> Self {
        Self {
            order_id,
            hash: signed.hash,
            merchant_id: signed.merchant_id,
        }
    }

    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}
