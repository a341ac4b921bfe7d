use crate::model::{Amount, MonthKey};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};

/// The identifier of a transaction as assigned by the server.
///
/// Backends disagree on whether ids are strings or integers. Both are accepted and kept in their
/// string form, which is also what goes into the `DELETE` URL.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

struct RecordIdVisitor;

impl<'de> Visitor<'de> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(RecordId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(RecordId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(RecordId(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RecordId::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(RecordId::default())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}

/// Whether a transaction brought money in or sent it out.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);

impl TransactionType {
    /// Anything other than "income" (in any letter case) is an expense.
    pub fn coerce(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("income") {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, TransactionType::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, TransactionType::Expense)
    }

    /// The sign shown in front of an amount of this type.
    pub fn sign(&self) -> char {
        match self {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        }
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = deserializer.deserialize_any(ScalarVisitor)?;
        Ok(TransactionType::coerce(&s))
    }
}

/// One transaction as served by the API.
///
/// Every field except `id` is optional on the wire; missing values fall back to their defaults
/// rather than failing the whole snapshot.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionRecord {
    #[serde(alias = "_id", default)]
    pub(crate) id: RecordId,
    #[serde(default)]
    pub(crate) amount: Amount,
    #[serde(rename = "type", default)]
    pub(crate) transaction_type: TransactionType,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub(crate) category: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub(crate) date: String,
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) note: Option<String>,
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<RecordId>,
        amount: Amount,
        transaction_type: TransactionType,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            transaction_type,
            category: category.into(),
            date: date.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// The calendar month this record falls in, or `None` when the date cannot be parsed.
    pub fn month(&self) -> Option<MonthKey> {
        MonthKey::from_date_str(&self.date)
    }
}

/// The body of a create request.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewTransaction {
    pub(crate) amount: Amount,
    pub(crate) category: String,
    #[serde(rename = "type")]
    pub(crate) transaction_type: TransactionType,
    pub(crate) date: String,
    pub(crate) note: String,
}

impl NewTransaction {
    pub fn new(
        amount: Amount,
        transaction_type: TransactionType,
        category: impl Into<String>,
        date: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            category: category.into(),
            transaction_type,
            date: date.into(),
            note: note.into(),
        }
    }

    /// Turns the request into a stored record with the given id, used by stores that assign ids
    /// themselves.
    pub(crate) fn into_record(self, id: RecordId) -> TransactionRecord {
        TransactionRecord {
            id,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
            date: self.date,
            note: if self.note.is_empty() {
                None
            } else {
                Some(self.note)
            },
        }
    }
}

/// Reads any JSON scalar as text. Null becomes the empty string and numbers and booleans keep
/// their JSON spelling, so an odd field degrades that one value instead of the whole snapshot.
struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarVisitor)
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = deserializer.deserialize_any(ScalarVisitor)?;
    Ok((!s.is_empty()).then_some(s))
}
