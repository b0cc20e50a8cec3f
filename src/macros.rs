/*!
The `macros` module provides macros for internal use.
!*/

/// Declares a packed UMP message struct over a fixed array of 32-bit words.
///
/// Example:
/// ```text
/// ump_message_type! {
///     /// MIDI 1.0 note-on message.
///     pub struct NoteOn([u32; 1] = [0x2090_0000]) {
///         group / with_group: u8 => (0, 24, 4);
///         channel / with_channel: u8 => (0, 16, 4);
///         note / with_note: u8 => (0, 8, 7);
///         velocity / with_velocity: u8 => (0, 0, 7);
///     }
/// }
/// ```
/// Each field names its getter and its builder-style setter, its value type, and the
/// `(word, start-bit, width)` position it occupies. The initializer words carry the message-type
/// and status bits that identify the message on the wire.
macro_rules! ump_message_type {
    (
        $(#[$meta:meta])*
        pub struct $name:ident([u32; $n:tt] = [$($init:expr),+ $(,)?]) {
            $(
                $(#[$fmeta:meta])*
                $getter:ident / $builder:ident : $ty:ty => ($word:expr, $start:expr, $width:expr);
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        pub struct $name {
            w: [u32; $n],
        }

        impl Default for $name {
            fn default() -> Self {
                Self { w: [$($init),+] }
            }
        }

        impl $name {
            /// The number of 32-bit words in this message.
            pub const WORDS: usize = $n;

            pub fn new() -> Self {
                Self::default()
            }

            /// Reconstitutes a message from raw words. The caller vouches that the word images
            /// carry this message's type and status bits.
            pub fn from_words(w: [u32; $n]) -> Self {
                Self { w }
            }

            /// The raw words of the message.
            pub fn words(&self) -> [u32; $n] {
                self.w
            }

            /// The `index`-th raw word of the message.
            pub fn word(&self, index: usize) -> u32 {
                self.w[index]
            }

            $(
                $(#[$fmeta])*
                pub fn $getter(&self) -> $ty {
                    crate::bitfield::get(self.w[$word], $start, $width) as $ty
                }

                /// Returns the message with this field replaced.
                pub fn $builder(mut self, value: $ty) -> Self {
                    self.w[$word] =
                        crate::bitfield::set(self.w[$word], $start, $width, value as u32);
                    self
                }
            )*
        }
    };
}

/// Declares a closure-backed implementation of a backend trait: one optional boxed closure per
/// trait method, an `on_*` installer for each, and a trait impl that forwards to the closure when
/// one is installed and otherwise does nothing.
macro_rules! function_backend {
    (
        $(#[$meta:meta])*
        pub struct $name:ident implements $trait_:ident {
            $(
                $method:ident / $setter:ident ( $($arg:ident : $ty:ty),* );
            )*
        }
    ) => {
        $(#[$meta])*
        #[allow(clippy::type_complexity)]
        pub struct $name<C> {
            $( $method: Option<Box<dyn FnMut(&mut C $(, $ty)*)>>, )*
        }

        impl<C> Default for $name<C> {
            fn default() -> Self {
                Self {
                    $( $method: None, )*
                }
            }
        }

        impl<C> $name<C> {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                /// Installs the handler for this message.
                pub fn $setter(
                    &mut self,
                    handler: impl FnMut(&mut C $(, $ty)*) + 'static,
                ) -> &mut Self {
                    self.$method = Some(Box::new(handler));
                    self
                }
            )*
        }

        impl<C> $trait_<C> for $name<C> {
            $(
                fn $method(&mut self, context: &mut C $(, $arg: $ty)*) {
                    if let Some(handler) = self.$method.as_mut() {
                        handler(context $(, $arg)*)
                    }
                }
            )*
        }
    };
}
