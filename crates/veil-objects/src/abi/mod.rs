use alloc::{string::String, vec::Vec};
use core::fmt::{Debug, Display, Formatter};

use crate::{
    AbiError, Felt, Hasher,
    utils::serde::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable},
};

// FUNCTION SELECTOR
// ================================================================================================

/// A four-byte identifier of a contract function.
///
/// Selectors are derived from the function name: the first four bytes of the RPO hash of the
/// name's UTF-8 encoding.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FunctionSelector([u8; 4]);

impl FunctionSelector {
    /// Returns a new [FunctionSelector] instantiated from the provided bytes.
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Returns the selector of the function with the provided name.
    pub fn from_name(name: &str) -> Self {
        let digest = Hasher::hash(name.as_bytes());
        let bytes = digest.as_bytes();
        Self([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Returns the byte representation of this selector.
    pub const fn as_bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl Display for FunctionSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:02x}{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl Debug for FunctionSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Serializable for FunctionSelector {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_bytes(&self.0);
    }
}

impl Deserializable for FunctionSelector {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self(source.read_array()?))
    }
}

// ABI TYPES
// ================================================================================================

/// The type of a function parameter or return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbiType {
    /// A single field element.
    Field,
    /// An elliptic-curve point encoded as two field elements (x, y).
    Point,
    /// A fixed-length array of field elements.
    Array(usize),
}

impl AbiType {
    /// Returns the number of field elements a value of this type occupies on the wire.
    pub const fn width(&self) -> usize {
        match self {
            Self::Field => 1,
            Self::Point => 2,
            Self::Array(len) => *len,
        }
    }
}

/// A single named parameter of a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiParameter {
    name: String,
    ty: AbiType,
}

impl AbiParameter {
    /// Returns a new [AbiParameter] with the specified name and type.
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self { name: name.into(), ty }
    }

    /// Returns the name of this parameter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of this parameter.
    pub fn ty(&self) -> AbiType {
        self.ty
    }
}

/// A typed argument or return value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Field(Felt),
    Point { x: Felt, y: Felt },
    Array(Vec<Felt>),
}

impl AbiValue {
    /// Returns true if this value matches the provided type.
    pub fn matches(&self, ty: AbiType) -> bool {
        match (self, ty) {
            (Self::Field(_), AbiType::Field) => true,
            (Self::Point { .. }, AbiType::Point) => true,
            (Self::Array(elements), AbiType::Array(len)) => elements.len() == len,
            _ => false,
        }
    }

    fn encode_into(&self, target: &mut Vec<Felt>) {
        match self {
            Self::Field(value) => target.push(*value),
            Self::Point { x, y } => {
                target.push(*x);
                target.push(*y);
            },
            Self::Array(elements) => target.extend_from_slice(elements),
        }
    }

    fn decode(ty: AbiType, source: &[Felt]) -> Self {
        match ty {
            AbiType::Field => Self::Field(source[0]),
            AbiType::Point => Self::Point { x: source[0], y: source[1] },
            AbiType::Array(_) => Self::Array(source.to_vec()),
        }
    }
}

// FUNCTION ABI
// ================================================================================================

/// The parameter and return layout of a contract function, used to encode arguments into and
/// decode return values out of flat field-element arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionAbi {
    name: String,
    selector: FunctionSelector,
    parameters: Vec<AbiParameter>,
    returns: Vec<AbiType>,
}

impl FunctionAbi {
    /// Returns a new [FunctionAbi] for the named function; the selector is derived from the name.
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<AbiParameter>,
        returns: Vec<AbiType>,
    ) -> Self {
        let name = name.into();
        let selector = FunctionSelector::from_name(&name);
        Self { name, selector, parameters, returns }
    }

    /// Returns the name of the function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the selector of the function.
    pub fn selector(&self) -> FunctionSelector {
        self.selector
    }

    /// Returns the declared parameters of the function.
    pub fn parameters(&self) -> &[AbiParameter] {
        &self.parameters
    }

    /// Returns the declared return types of the function.
    pub fn returns(&self) -> &[AbiType] {
        &self.returns
    }

    /// Returns the total width, in field elements, of the function's parameters.
    pub fn parameter_width(&self) -> usize {
        self.parameters.iter().map(|parameter| parameter.ty().width()).sum()
    }

    /// Returns the total width, in field elements, of the function's return data.
    pub fn return_width(&self) -> usize {
        self.returns.iter().map(AbiType::width).sum()
    }

    /// Encodes the provided values into a flat field-element array per this ABI.
    ///
    /// # Errors
    /// Returns an error if the number of values differs from the number of declared parameters,
    /// or if any value does not match its declared type.
    pub fn encode_arguments(&self, values: &[AbiValue]) -> Result<Vec<Felt>, AbiError> {
        if values.len() != self.parameters.len() {
            return Err(AbiError::ArgumentCountMismatch {
                expected: self.parameters.len(),
                actual: values.len(),
            });
        }

        let mut encoded = Vec::new();
        for (index, (value, parameter)) in values.iter().zip(self.parameters.iter()).enumerate() {
            if !value.matches(parameter.ty()) {
                return Err(AbiError::ArgumentTypeMismatch { index, expected: parameter.ty() });
            }
            value.encode_into(&mut encoded);
        }

        Ok(encoded)
    }

    /// Decodes a flat field-element array into typed return values per this ABI.
    ///
    /// # Errors
    /// Returns an error if the array's width differs from the declared return width.
    pub fn decode_return_values(&self, raw: &[Felt]) -> Result<Vec<AbiValue>, AbiError> {
        if raw.len() != self.return_width() {
            return Err(AbiError::ReturnWidthMismatch {
                expected: self.return_width(),
                actual: raw.len(),
            });
        }

        let mut decoded = Vec::with_capacity(self.returns.len());
        let mut offset = 0;
        for ty in &self.returns {
            let width = ty.width();
            decoded.push(AbiValue::decode(*ty, &raw[offset..offset + width]));
            offset += width;
        }

        Ok(decoded)
    }
}

// TESTS
// ================================================================================================
