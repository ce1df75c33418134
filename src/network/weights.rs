//! Float32 weight payload codec.
//!
//! The payload is the concatenation of every tensor in the manifest, each
//! stored as little-endian `f32` values in row-major order.

use crate::error::LoadError;
use crate::network::spec::WeightSpec;

/// Splits `payload` into one `Vec<f32>` per spec, in order.
///
/// Fails when a spec uses a dtype other than `float32` or when the payload
/// length differs from what the specs describe.
pub fn decode_weights(specs: &[&WeightSpec], payload: &[u8]) -> Result<Vec<Vec<f32>>, LoadError> {
    if let Some(bad) = specs.iter().find(|s| s.dtype != "float32") {
        return Err(LoadError::UnsupportedDtype { name: bad.name.clone(), dtype: bad.dtype.clone() });
    }

    let mut sizes = Vec::with_capacity(specs.len());
    let mut expected = 0usize;
    for spec in specs {
        let size = spec
            .byte_len()
            .and_then(|n| expected.checked_add(n).map(|total| (n, total)))
            .ok_or_else(|| {
                LoadError::InvalidTopology(format!("weight {} has an oversized shape {:?}", spec.name, spec.shape))
            })?;
        sizes.push(size.0);
        expected = size.1;
    }
    if payload.len() != expected {
        return Err(LoadError::WeightPayloadSize { expected, actual: payload.len() });
    }

    let mut offset = 0;
    let tensors = sizes
        .into_iter()
        .map(|size| {
            let bytes = &payload[offset..offset + size];
            offset += size;
            bytes
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect()
        })
        .collect();
    Ok(tensors)
}

/// Inverse of [`decode_weights`]: concatenates tensors as little-endian `f32`.
pub fn encode_weights<'a, I>(tensors: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    tensors
        .into_iter()
        .flat_map(|t| t.iter().flat_map(|v| v.to_le_bytes()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, shape: Vec<usize>) -> WeightSpec {
        WeightSpec { name: name.into(), shape, dtype: "float32".into() }
    }

    #[test]
    fn test_decode_splits_in_order() {
        let a = spec("a", vec![2]);
        let b = spec("b", vec![1, 3]);
        let payload = encode_weights([&[1.0f32, 2.0][..], &[3.0, 4.0, 5.0][..]]);
        let out = decode_weights(&[&a, &b], &payload).unwrap();
        assert_eq!(out, vec![vec![1.0, 2.0], vec![3.0, 4.0, 5.0]]);
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let a = spec("a", vec![4]);
        let err = decode_weights(&[&a], &[0u8; 12]).unwrap_err();
        assert!(matches!(err, LoadError::WeightPayloadSize { expected: 16, actual: 12 }));
    }

    #[test]
    fn test_decode_rejects_overflowing_shape() {
        let a = spec("a", vec![1 << 62]);
        let err = decode_weights(&[&a], &[0u8; 4]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTopology(_)));

        let b = spec("b", vec![usize::MAX / 4]);
        let c = spec("c", vec![usize::MAX / 4]);
        let err = decode_weights(&[&b, &c], &[]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTopology(_)));
    }

    #[test]
    fn test_decode_rejects_other_dtypes() {
        let mut a = spec("a", vec![1]);
        a.dtype = "int32".into();
        let err = decode_weights(&[&a], &[0u8; 4]).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedDtype { .. }));
    }
}
