/// Implements `reason()` for an error enum by mapping each variant pattern to an `ErrorReason`
#[macro_export]
macro_rules! impl_error_reason {
    ($error:ty => $reason:ty { $($pattern:pat => $value:expr),+ $(,)? }) => {
        impl $error {
            /// The taxonomy code of this error
            pub fn reason(&self) -> $reason {
                match self {
                    $($pattern => $value),+
                }
            }
        }
    };
}
