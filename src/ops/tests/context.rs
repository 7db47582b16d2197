use crate::assert_err;
use crate::errors::{ArgumentKind, OpError};
use crate::ops::{OpContext, OpDescriptor, VARIADIC};
use crate::tensor::Tensor;

#[test]
fn test_positional_access() -> Result<(), OpError> {
    let a = Tensor::new(&[1., 2.], &[2]);
    let b = Tensor::new(&[3.], &[1]);
    let ctx = OpContext::new()
        .with_inputs(&[&a, &b])
        .with_i_args(&[2, 2, 2])
        .with_t_args(&[0.5]);

    assert_eq!(ctx.width(), 2);
    assert_eq!(ctx.input("ctx", 1)?.shape(), &[1]);
    assert_eq!(ctx.int_arg("ctx", 2)?, 2);
    assert_eq!(ctx.scalar_arg("ctx", 0)?, 0.5);
    Ok(())
}

#[test]
fn test_missing_positions_are_argument_count_errors() {
    let a = Tensor::new(&[1.], &[1]);
    let ctx = OpContext::new().with_inputs(&[&a]).with_i_args(&[1]);

    assert_err!(
        ctx.input("ctx", 1),
        OpError::ArgumentCount { kind: ArgumentKind::Input, expected: 2, got: 1, .. }
    );
    assert_err!(
        ctx.int_arg("ctx", 3),
        OpError::ArgumentCount { kind: ArgumentKind::IntArg, expected: 4, got: 1, .. }
    );
    assert_err!(
        ctx.scalar_arg("ctx", 0),
        OpError::ArgumentCount { kind: ArgumentKind::ScalarArg, got: 0, .. }
    );
}

#[test]
fn test_validate_arity() -> Result<(), OpError> {
    let desc = OpDescriptor::custom("needs_two", 2, 1, false, 1, 3).build()?;
    let a = Tensor::new(&[1.], &[1]);

    let ctx = OpContext::new()
        .with_inputs(&[&a, &a])
        .with_i_args(&[1, 2, 3, 4])
        .with_t_args(&[1.0]);
    ctx.validate_arity(&desc)?;

    let short = OpContext::new().with_inputs(&[&a]).with_i_args(&[1, 2, 3]).with_t_args(&[1.0]);
    assert_err!(
        short.validate_arity(&desc),
        OpError::ArgumentCount { kind: ArgumentKind::Input, expected: 2, got: 1, .. }
    );

    let short = OpContext::new().with_inputs(&[&a, &a]).with_t_args(&[1.0]);
    assert_err!(
        short.validate_arity(&desc),
        OpError::ArgumentCount { kind: ArgumentKind::IntArg, expected: 3, got: 0, .. }
    );
    Ok(())
}

#[test]
fn test_variadic_counts_are_skipped() -> Result<(), OpError> {
    let desc = OpDescriptor::custom("concat", VARIADIC, 1, false, VARIADIC, VARIADIC).build()?;
    OpContext::new().validate_arity(&desc)
}
