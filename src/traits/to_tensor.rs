use burn::{
    prelude::*,
    tensor::{backend::Backend, BasicOps, TensorData},
};

use crate::error::{DdpgError, Result};

/// A trait for converting host-side batches to tensors
///
/// Implemented for `&[f32]` (one value per sample) and `&[Vec<f32>]` (one
/// row per sample). Rows are assumed to share one width; validate the batch
/// first.
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B: Backend> ToTensor<B, 1, Float> for &[f32] {
    #[inline]
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1> {
        let data = TensorData::new(self.to_vec(), [self.len()]);
        Tensor::from_data(data.convert::<B::FloatElem>(), device)
    }
}

impl<B: Backend> ToTensor<B, 2, Float> for &[Vec<f32>] {
    #[inline]
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2> {
        let rows = self.len();
        let cols = self.first().map_or(0, Vec::len);

        let mut flat = Vec::with_capacity(rows * cols);
        for row in self {
            flat.extend_from_slice(row);
        }

        let data = TensorData::new(flat, [rows, cols]);
        Tensor::from_data(data.convert::<B::FloatElem>(), device)
    }
}

/// Read a float tensor back as a flat vector
pub fn into_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| DdpgError::TensorData(format!("{e:?}")))
}

/// Read a `[rows, cols]` tensor back as one vector per row
pub fn into_rows<B: Backend>(tensor: Tensor<B, 2>) -> Result<Vec<Vec<f32>>> {
    let [_, cols] = tensor.dims();
    let values = into_vec(tensor)?;
    Ok(values.chunks(cols.max(1)).map(<[f32]>::to_vec).collect())
}
