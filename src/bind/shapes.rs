use crate::bencode::{BencodeError, Value};
use bytes::Bytes;
use std::collections::BTreeMap;

/// Populates a slot from a decoded [`Value`].
///
/// Implementations for primitive shapes live in this module; named types
/// that need a non-structural conversion (timestamps, digest arrays,
/// records) provide their own impl, which the compiler always selects over
/// the generic container impls below.
///
/// A type that opts in with an empty `impl Bind for T {}` compiles but
/// fails at bind time with [`BencodeError::Unsupported`].
pub trait Bind: Default {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        let _ = value;
        Err(BencodeError::Unsupported(std::any::type_name::<Self>()))
    }

    /// Binds a `Vec<Self>`.
    ///
    /// The value must be a list; elements are bound in order and the first
    /// failing element aborts the whole sequence, leaving `seq` untouched.
    /// Element types with a packed wire form (bytes, digests) override this.
    fn bind_seq(seq: &mut Vec<Self>, value: &Value) -> Result<(), BencodeError> {
        let list = value.try_list()?;
        let mut items = Vec::with_capacity(list.len());
        for (index, item) in list.iter().enumerate() {
            let mut slot = Self::default();
            slot.bind(item)
                .map_err(|e| e.in_field(format!("[{index}]")))?;
            items.push(slot);
        }
        *seq = items;
        Ok(())
    }
}

/// Converts a slot back into a [`Value`].
///
/// `Ok(None)` means "nothing to emit"; record encoding drops such fields
/// when they are `omitempty`. A slot whose content has no bencode form (an
/// unsigned integer above `i64::MAX`) fails instead of being truncated.
pub trait Unbind {
    fn unbind(&self) -> Result<Option<Value>, BencodeError>;

    fn unbind_seq(seq: &[Self]) -> Result<Value, BencodeError>
    where
        Self: Sized,
    {
        let mut items = Vec::with_capacity(seq.len());
        for (index, item) in seq.iter().enumerate() {
            if let Some(value) = item.unbind().map_err(|e| e.in_field(format!("[{index}]")))? {
                items.push(value);
            }
        }
        Ok(Value::List(items))
    }
}

macro_rules! integer_shape {
    (lossless: $($ty:ty),*) => {$(
        integer_shape!(@impl $ty, |n| Ok(i64::from(n)));
    )*};
    (checked: $($ty:ty),*) => {$(
        integer_shape!(@impl $ty, |n| {
            i64::try_from(n).map_err(|_| BencodeError::IntegerTooLarge(n as u64))
        });
    )*};
    (@impl $ty:ty, $unbind:expr) => {
        impl Bind for $ty {
            fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
                let raw = value.try_integer()?;
                *self = <$ty>::try_from(raw).map_err(|_| BencodeError::IntegerOutOfRange(raw))?;
                Ok(())
            }
        }

        impl Unbind for $ty {
            fn unbind(&self) -> Result<Option<Value>, BencodeError> {
                let to_integer: fn($ty) -> Result<i64, BencodeError> = $unbind;
                Ok(Some(Value::Integer(to_integer(*self)?)))
            }
        }
    };
}

integer_shape!(lossless: i64, i32, i16, u32, u16);
integer_shape!(checked: u64, usize);

// A byte is an integer on its own but a sequence of bytes is one byte string.
impl Bind for u8 {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        let raw = value.try_integer()?;
        *self = u8::try_from(raw).map_err(|_| BencodeError::IntegerOutOfRange(raw))?;
        Ok(())
    }

    fn bind_seq(seq: &mut Vec<Self>, value: &Value) -> Result<(), BencodeError> {
        *seq = value.try_bytes()?.to_vec();
        Ok(())
    }
}

impl Unbind for u8 {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        Ok(Some(Value::Integer(i64::from(*self))))
    }

    fn unbind_seq(seq: &[Self]) -> Result<Value, BencodeError> {
        Ok(Value::Bytes(Bytes::copy_from_slice(seq)))
    }
}

impl Bind for bool {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        *self = value.try_integer()? != 0;
        Ok(())
    }
}

impl Unbind for bool {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        Ok(Some(Value::Integer(i64::from(*self))))
    }
}

impl Bind for String {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        *self = value.try_str()?.to_owned();
        Ok(())
    }
}

impl Unbind for String {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        Ok(Some(Value::string(self)))
    }
}

impl Bind for Bytes {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        *self = value.try_bytes()?.clone();
        Ok(())
    }
}

impl Unbind for Bytes {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        Ok(Some(Value::Bytes(self.clone())))
    }
}

// Optional slots are allocated on first use and only stored once the inner
// bind succeeds.
impl<T: Bind> Bind for Option<T> {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        match self {
            Some(inner) => inner.bind(value),
            None => {
                let mut inner = T::default();
                inner.bind(value)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }
}

impl<T: Unbind> Unbind for Option<T> {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        match self {
            Some(inner) => inner.unbind(),
            None => Ok(None),
        }
    }
}

impl<T: Bind> Bind for Vec<T> {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        T::bind_seq(self, value)
    }
}

impl<T: Unbind> Unbind for Vec<T> {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        T::unbind_seq(self).map(Some)
    }
}

impl<T: Bind> Bind for BTreeMap<String, T> {
    fn bind(&mut self, value: &Value) -> Result<(), BencodeError> {
        let dict = value.try_dict()?;
        let mut map = BTreeMap::new();
        for (key, item) in dict {
            let key = std::str::from_utf8(key)
                .map_err(|_| BencodeError::InvalidUtf8)?
                .to_owned();
            let mut slot = T::default();
            slot.bind(item).map_err(|e| e.in_field(key.clone()))?;
            map.insert(key, slot);
        }
        *self = map;
        Ok(())
    }
}

impl<T: Unbind> Unbind for BTreeMap<String, T> {
    fn unbind(&self) -> Result<Option<Value>, BencodeError> {
        let mut dict = BTreeMap::new();
        for (key, item) in self {
            if let Some(value) = item.unbind().map_err(|e| e.in_field(key.clone()))? {
                dict.insert(Bytes::copy_from_slice(key.as_bytes()), value);
            }
        }
        Ok(Some(Value::Dict(dict)))
    }
}
