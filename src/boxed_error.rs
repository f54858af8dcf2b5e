//! Error types as a `Box` around a `thiserror` enum, so that the
//! `Result`s handed back through the builtin table stay one word
//! wide on the error side.

/// Define `$wrappername(Box<$kindname>)`. `Deref` gives access to the
/// kind for matching, `From` forwards to the kind's `From` impls (so
/// `#[from]` and `?` keep working), `Display` and `source` come from
/// the kind.
#[macro_export]
macro_rules! def_boxed_error {
    ($wrappername:ident, $kindname:ident) => {

        #[derive(Debug)]
        pub struct $wrappername(Box<$kindname>);

        impl $wrappername {
            pub fn kind(&self) -> &$kindname {
                &*self.0
            }
        }

        impl std::ops::Deref for $wrappername {
            type Target = $kindname;

            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl<E> From<E> for $wrappername where $kindname: From<E> {
            fn from(err: E) -> Self {
                $wrappername(Box::new($kindname::from(err)))
            }
        }

        impl std::error::Error for $wrappername {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                std::error::Error::source(&*self.0)
            }
        }

        impl std::fmt::Display for $wrappername {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                // Not self.0.fmt(f), that one is ambiguous
                std::fmt::Display::fmt(&*self.0, f)
            }
        }
    }
}

/// Define the kind enum (deriving `thiserror::Error` and `Debug`) and
/// its box wrapper in one go.
#[macro_export]
macro_rules! def_boxed_thiserror {
    ($wrappername:ident, $vis:vis enum $kindname:ident {$($body:tt)*}) => {
        #[derive(thiserror::Error, Debug)]
        $vis enum $kindname {
            $($body)*
        }

        $crate::def_boxed_error!($wrappername, $kindname);
    };
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    def_boxed_thiserror!(TestError, pub enum TestErrorKind {
        #[error("io: {0}")]
        Io(#[from] std::io::Error),
        #[error("bad {0:?}")]
        Bad(String),
    });

    fn fails() -> Result<(), TestError> {
        Err(TestErrorKind::Bad("x".into()))?
    }

    #[test]
    fn t_boxed() {
        assert_eq!(size_of::<TestError>(), size_of::<usize>());
        let e = fails().unwrap_err();
        assert_eq!(e.to_string(), "bad \"x\"");
        assert!(matches!(e.kind(), TestErrorKind::Bad(_)));
        let e: TestError = std::io::Error::new(std::io::ErrorKind::Other, "gone").into();
        assert_eq!(e.to_string(), "io: gone");
    }
}
