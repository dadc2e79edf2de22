//! Schema-driven body decoding.

use solana_sdk::pubkey::Pubkey;

use crate::EventError;
use crate::schema::{EventSchema, FieldSpec, FieldType};

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U64(u64),
    I64(i64),
    Bool(bool),
    Pubkey(Pubkey),
    Bytes(Vec<u8>),
    Array(Vec<FieldValue>),
    Struct(Vec<(&'static str, FieldValue)>),
}

pub type Fields = Vec<(&'static str, FieldValue)>;

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, event: &'static str, n: usize) -> Result<&'a [u8], EventError> {
        let end = self.pos + n;
        let slice = self
            .buf
            .get(self.pos..end)
            .ok_or_else(|| EventError::malformed(event, "body truncated"))?;
        self.pos = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, event: &'static str) -> Result<[u8; N], EventError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(event, N)?);
        Ok(out)
    }
}

/// Decode an event body against its schema. The body must be exactly the
/// schema's width.
pub fn decode_body(schema: &EventSchema, body: &[u8]) -> Result<Fields, EventError> {
    let expected = schema.body_len();
    if body.len() != expected {
        return Err(EventError::malformed(
            schema.name,
            format!("expected {expected} body bytes, got {}", body.len()),
        ));
    }

    let mut reader = Reader { buf: body, pos: 0 };
    decode_fields(schema.name, schema.fields, &mut reader)
}

fn decode_fields(
    event: &'static str,
    fields: &'static [FieldSpec],
    reader: &mut Reader<'_>,
) -> Result<Fields, EventError> {
    fields
        .iter()
        .map(|f| -> Result<(&'static str, FieldValue), EventError> {
            Ok((f.name, decode_value(event, f.name, &f.ty, reader)?))
        })
        .collect()
}

fn decode_value(
    event: &'static str,
    field: &'static str,
    ty: &FieldType,
    reader: &mut Reader<'_>,
) -> Result<FieldValue, EventError> {
    let value = match ty {
        FieldType::U8 => FieldValue::U8(reader.take_array::<1>(event)?[0]),
        FieldType::U16 => FieldValue::U16(u16::from_le_bytes(reader.take_array(event)?)),
        FieldType::U64 => FieldValue::U64(u64::from_le_bytes(reader.take_array(event)?)),
        FieldType::I64 => FieldValue::I64(i64::from_le_bytes(reader.take_array(event)?)),
        FieldType::Bool => match reader.take_array::<1>(event)?[0] {
            0 => FieldValue::Bool(false),
            1 => FieldValue::Bool(true),
            other => {
                return Err(EventError::malformed(
                    event,
                    format!("field `{field}` has invalid bool byte {other}"),
                ));
            }
        },
        FieldType::Pubkey => FieldValue::Pubkey(Pubkey::new_from_array(reader.take_array(event)?)),
        FieldType::Bytes(len) => FieldValue::Bytes(reader.take(event, *len)?.to_vec()),
        FieldType::Array(inner, len) => FieldValue::Array(
            (0..*len)
                .map(|_| decode_value(event, field, inner, reader))
                .collect::<Result<_, _>>()?,
        ),
        FieldType::Struct(fields) => FieldValue::Struct(decode_fields(event, fields, reader)?),
    };
    Ok(value)
}

/// Typed access to decoded fields.
pub(crate) struct FieldView<'a> {
    event: &'static str,
    fields: &'a [(&'static str, FieldValue)],
}

impl<'a> FieldView<'a> {
    pub(crate) fn new(event: &'static str, fields: &'a [(&'static str, FieldValue)]) -> Self {
        Self { event, fields }
    }

    fn get(&self, name: &str) -> Result<&'a FieldValue, EventError> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| EventError::malformed(self.event, format!("missing field `{name}`")))
    }

    fn mismatch(&self, name: &str) -> EventError {
        EventError::malformed(self.event, format!("field `{name}` has unexpected type"))
    }

    pub(crate) fn pubkey(&self, name: &str) -> Result<Pubkey, EventError> {
        match self.get(name)? {
            FieldValue::Pubkey(pk) => Ok(*pk),
            _ => Err(self.mismatch(name)),
        }
    }

    pub(crate) fn u64(&self, name: &str) -> Result<u64, EventError> {
        match self.get(name)? {
            FieldValue::U64(v) => Ok(*v),
            _ => Err(self.mismatch(name)),
        }
    }

    pub(crate) fn i64(&self, name: &str) -> Result<i64, EventError> {
        match self.get(name)? {
            FieldValue::I64(v) => Ok(*v),
            _ => Err(self.mismatch(name)),
        }
    }

    pub(crate) fn bytes(&self, name: &str) -> Result<&'a [u8], EventError> {
        match self.get(name)? {
            FieldValue::Bytes(v) => Ok(v),
            _ => Err(self.mismatch(name)),
        }
    }
}
