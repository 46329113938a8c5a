/// Объявляет закрытый набор альтернатив для [`Broker`](crate::pubsub::Broker).
///
/// Генерирует перечисление и реализации:
/// - [`Alternatives`](crate::pubsub::Alternatives);
/// - `Project<Payload>` и `From<Payload>` для каждого варианта;
/// - `Project<View>` для каждой строки `view View => A, B;` (общий тип,
///   чаще всего trait-объект);
/// - `Widen<Wide>` для каждой строки `widen Wide => A, B;` (расширение по
///   значению через `From`).
///
/// Типы полезной нагрузки вариантов должны быть попарно различны.
///
/// ```
/// herald::alternatives! {
///     #[derive(Debug)]
///     pub enum Number {
///         Int(i32),
///         Float(f32),
///     }
///     widen f64 => Int, Float;
/// }
///
/// let broker = herald::Broker::<Number>::new();
/// let _sub = broker.subscribe_value(|x: f64| assert_eq!(x, 2.0)).unwrap();
/// broker.publish(2).unwrap();
/// ```
#[macro_export]
macro_rules! alternatives {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident($payload:ty) ),+ $(,)?
        }
        $( view $view:ty => $($view_variant:ident),+ ; )*
        $( widen $wide:ty => $($wide_variant:ident),+ ; )*
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant($payload), )+
        }

        impl $crate::pubsub::Alternatives for $name {
            const NAMES: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn index(&self) -> usize {
                enum Tag {
                    $($variant),+
                }
                match self {
                    $( Self::$variant(_) => Tag::$variant as usize, )+
                }
            }
        }

        $(
            impl $crate::pubsub::Project<$payload> for $name {
                fn accepts(index: usize) -> bool {
                    <Self as $crate::pubsub::Alternatives>::NAMES.get(index)
                        == Some(&stringify!($variant))
                }

                fn project(&mut self) -> Option<&mut $payload> {
                    match self {
                        Self::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl From<$payload> for $name {
                fn from(value: $payload) -> Self {
                    Self::$variant(value)
                }
            }
        )+

        $(
            impl $crate::pubsub::Project<$view> for $name {
                fn accepts(index: usize) -> bool {
                    <Self as $crate::pubsub::Alternatives>::NAMES
                        .get(index)
                        .is_some_and(|name| [$(stringify!($view_variant)),+].contains(name))
                }

                fn project(&mut self) -> Option<&mut $crate::pubsub::envelope::Target<$view>> {
                    match self {
                        $( Self::$view_variant(inner) => Some(inner as &mut $view), )+
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*

        $(
            impl $crate::pubsub::Widen<$wide> for $name {
                fn accepts(index: usize) -> bool {
                    <Self as $crate::pubsub::Alternatives>::NAMES
                        .get(index)
                        .is_some_and(|name| [$(stringify!($wide_variant)),+].contains(name))
                }

                fn widen(&self) -> Option<$wide> {
                    match self {
                        $(
                            Self::$wide_variant(inner) => {
                                Some(<$wide as ::core::convert::From<_>>::from(
                                    ::core::clone::Clone::clone(inner),
                                ))
                            }
                        )+
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}
