/// Wire format flavour of the remote service.
///
/// `Legacy` frames ids as 32-bit ints (or decimal text), counts as ints and
/// floats as decimal text. `Modern` uses native 64-bit ids, 16-bit counts and
/// IEEE floats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProtocolVariant {
    Legacy,
    #[default]
    Modern,
}

impl ProtocolVariant {
    pub fn is_legacy(self) -> bool {
        self == ProtocolVariant::Legacy
    }

    pub fn is_modern(self) -> bool {
        self == ProtocolVariant::Modern
    }
}
