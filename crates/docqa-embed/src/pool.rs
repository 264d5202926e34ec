use candle_core::{DType, Result, Tensor};

/// Mean of the token embeddings selected by `attention_mask`, L2-normalised.
///
/// `hidden` is `[batch, tokens, hidden]`, `attention_mask` is `[batch, tokens]`
/// of any numeric dtype; the result is `[batch, hidden]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let mask = attention_mask
        .to_device(hidden.device())?
        .to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?.broadcast_as(hidden.shape())?;

    let sum = hidden.mul(&mask_3d)?.sum(1)?;
    let lengths = mask.sum_keepdim(1)?.clamp(1e-9, f64::MAX)?;
    let mean = sum.broadcast_div(&lengths)?;

    let eps = match hidden.dtype() {
        DType::F16 | DType::BF16 => 1e-6,
        _ => 1e-12,
    };
    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(eps, f64::MAX)?;
    mean.broadcast_div(&norm)
}
