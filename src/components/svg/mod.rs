use crate::prelude::*;

mod svgs;
pub use svgs::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvgSize {
    Size4,
    Size5,
    #[default]
    Size6,
    Size8,
    Size16,
}
impl SvgSize {
    fn class(self) -> &'static str {
        match self {
            Self::Size4 => "size-4",
            Self::Size5 => "size-5",
            Self::Size6 => "size-6",
            Self::Size8 => "size-8",
            Self::Size16 => "size-16",
        }
    }
}

pub trait DrawableSvg: 'static {
    fn path() -> &'static str;

    fn view_box() -> &'static str {
        "0 0 24 24"
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct DrawSvgProps {
    pub size: Option<SvgSize>,
}

/// Draws the icon `S`, filled with the current text color
#[allow(non_snake_case)]
pub fn DrawSvg<S: DrawableSvg>(DrawSvgProps { size }: DrawSvgProps) -> Element {
    let size_class = size.unwrap_or_default().class();
    rsx! {
        svg {
            xmlns: "http://www.w3.org/2000/svg",
            view_box: S::view_box(),
            class: "icon {size_class}",
            path { d: S::path() }
        }
    }
}
