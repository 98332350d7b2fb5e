// Macros to instrument (non-future) spans.

macro_rules! __wiring_span_internal {
    ($trace_type:ident; $($element:expr),*) => {
        #[cfg(feature = "tracing")]
        let myspan = ::tracing::span!(::tracing::Level::$trace_type, $($element),*);
        #[cfg(feature = "tracing")]
        let _enter = myspan.enter();
    };
}

macro_rules! __wiring_span_debug {
    ($($element:expr),*) => {
        __wiring_span_internal!(DEBUG; $($element),*);
    }
}

// Macros to instrument events.

macro_rules! __wiring_trace_internal {
    ($trace_type:ident; $($element:tt)*) => {{
        #[cfg(feature = "tracing")]
        {
            ::tracing::$trace_type!($($element)*);
        }
    }};
}

macro_rules! __wiring_trace {
    ($($element:tt)*) => {{
        __wiring_trace_internal!(trace; $($element)*)
    }};
}

macro_rules! __wiring_trace_debug {
    ($($element:tt)*) => {{
        __wiring_trace_internal!(debug; $($element)*)
    }};
}

macro_rules! __wiring_trace_warn {
    ($($element:tt)*) => {{
        __wiring_trace_internal!(warn; $($element)*)
    }};
}
