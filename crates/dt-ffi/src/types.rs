use dt_tensor::DType;

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DTStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorOutOfMemory = 2,
    ErrorIndexOutOfBounds = 3,
    ErrorDTypeMismatch = 4,
    ErrorInternal = 5,
}

/// Element representation selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DTDType {
    Float32 = 0,
    Float16 = 1,
    Int8 = 2,
}

impl From<DTDType> for DType {
    fn from(d: DTDType) -> Self {
        match d {
            DTDType::Float32 => DType::F32,
            DTDType::Float16 => DType::F16,
            DTDType::Int8 => DType::I8,
        }
    }
}

impl From<DType> for DTDType {
    fn from(d: DType) -> Self {
        match d {
            DType::F32 => DTDType::Float32,
            DType::F16 => DTDType::Float16,
            DType::I8 => DTDType::Int8,
        }
    }
}
