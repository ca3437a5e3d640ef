use std::marker::PhantomData;

/// The sigil syntax configuration.
///
/// Use [`Syntax::default()`] to get the default syntax configuration and
/// [`Syntax::builder()`] to create a custom syntax configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax<'a> {
    pub(crate) begin: String,
    pub(crate) end: String,
    _marker: PhantomData<&'a ()>,
}

/// A builder for the syntax configuration.
///
/// This struct is typically created using [`Syntax::builder()`].
#[derive(Debug, Clone)]
pub struct SyntaxBuilder<'a> {
    delims: Option<(&'a str, &'a str)>,
}

impl Default for Syntax<'_> {
    /// Returns the default syntax configuration.
    ///
    /// This is equivalent to the following.
    /// ```
    /// use sigils::Syntax;
    ///
    /// let syntax = Syntax::builder().delims("[", "]").build();
    /// assert_eq!(syntax, Syntax::default());
    /// ```
    #[inline]
    fn default() -> Self {
        Syntax::builder().delims("[", "]").build()
    }
}

impl<'a> Syntax<'a> {
    /// Create a new syntax builder.
    ///
    /// # Examples
    ///
    /// ```
    /// let syntax = sigils::Syntax::builder().delims("[[", "]]").build();
    /// ```
    #[inline]
    pub fn builder() -> SyntaxBuilder<'a> {
        SyntaxBuilder::new()
    }

    /// Returns the begin delimiter, e.g. `[`.
    #[inline]
    pub fn begin(&self) -> &str {
        &self.begin
    }

    /// Returns the end delimiter, e.g. `]`.
    #[inline]
    pub fn end(&self) -> &str {
        &self.end
    }
}

impl<'a> SyntaxBuilder<'a> {
    /// Creates a new syntax builder.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { delims: None }
    }

    /// Set the sigil delimiters.
    ///
    /// If not set then the default `[` and `]` are used.
    ///
    /// # Panics
    ///
    /// If either of the strings are empty or if they are equal.
    #[inline]
    pub fn delims(&mut self, begin: &'a str, end: &'a str) -> &mut Self {
        assert!(!begin.is_empty() && !end.is_empty());
        assert_ne!(begin, end, "begin and end delimiters must differ");
        self.delims = Some((begin, end));
        self
    }

    /// Builds the syntax configuration.
    pub fn build(&self) -> Syntax<'a> {
        let (begin, end) = self.delims.unwrap_or(("[", "]"));
        Syntax {
            begin: begin.into(),
            end: end.into(),
            _marker: PhantomData,
        }
    }
}
