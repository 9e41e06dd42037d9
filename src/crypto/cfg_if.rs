//! Modified implementation based on cfg-if (with modifications)
//!
//! Original source: https://github.com/rust-lang/cfg-if
//!
//! A macro for defining `#[cfg]` if-else chains without repeating the
//! identical predicates multiple times. Exported at the crate root so
//! `crate::cfg_if!` resolves from any module, matching the conventions of
//! the upstream `cfg-if` crate.

#[macro_export]
macro_rules! cfg_if {
    // match if/else chains with a final `else`
    ($(
        if #[cfg($($meta:meta),*)] { $($tokens:tt)* }
    ) else * else {
        $($tokens2:tt)*
    }) => {
        $crate::cfg_if! {
            @__items
            () ;
            $( ( ($($meta),*) ($($tokens)*) ), )*
            ( () ($($tokens2)*) ),
        }
    };

    // match if/else chains lacking a final `else`
    (
        if #[cfg($($i_met:meta),*)] { $($i_tokens:tt)* }
        $(
            else if #[cfg($($e_met:meta),*)] { $($e_tokens:tt)* }
        )*
    ) => {
        $crate::cfg_if! {
            @__items
            () ;
            ( ($($i_met),*) ($($i_tokens)*) ),
            $( ( ($($e_met),*) ($($e_tokens)*) ), )*
            ( () () ),
        }
    };

    // Internal and recursive rules:
    (@__items ($($not:meta,)*) ; ) => {};
    (@__items ($($not:meta,)*) ; ( ($($m:meta),*) ($($tokens:tt)*) ), $($rest:tt)*) => {
        #[cfg(all($($m,)* not(any($($not),*))))]
        $crate::cfg_if! { @__identity $($tokens)* }

        $crate::cfg_if! {
            @__items ($($not,)* $($m,)*) ;
            $($rest)*
        }
    };

    (@__identity $($tokens:tt)*) => {
        $($tokens)*
    };
}
