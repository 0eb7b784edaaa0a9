use std::collections::BTreeMap;
use std::sync::LazyLock;

use fake::Fake;
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryCode, CountryName, PostCode, StateAbbr, StateName,
    StreetName, ZipCode,
};
use fake::faker::company::en::{Buzzword, CatchPhrase, CompanyName, Industry};
use fake::faker::creditcard::en::CreditCardNumber;
use fake::faker::currency::en::{CurrencyCode, CurrencyName};
use fake::faker::filesystem::en::{FileExtension, FileName, FilePath};
use fake::faker::internet::en::{
    DomainSuffix, FreeEmail, IPv4, IPv6, MACAddress, Password, SafeEmail, UserAgent, Username,
};
use fake::faker::job::en::{Field as JobField, Title as JobTitle};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name, Suffix, Title};
use fake::faker::phone_number::en::{CellNumber, PhoneNumber};
use rand::{Rng, RngCore};

use crate::context::{ContextValue, MixedValue};

pub type FakeFn = fn(&mut dyn RngCore) -> MixedValue;

static REGISTRY: LazyLock<FakeRegistry> = LazyLock::new(FakeRegistry::builtin);

/// Named zero-argument generators that context files can reference with
/// `fake:<id>`. Ids are dot-separated and snake_cased (`person.first_name`).
pub struct FakeRegistry {
    fakes: BTreeMap<&'static str, FakeFn>,
}

impl FakeRegistry {
    pub fn global() -> &'static FakeRegistry {
        &REGISTRY
    }

    pub fn get(&self, id: &str) -> Option<FakeFn> {
        self.fakes.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fakes.contains_key(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fakes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fakes.is_empty()
    }

    pub fn context_value(&self, id: &str) -> Option<ContextValue> {
        let func = self.get(id)?;
        Some(ContextValue::generator(func))
    }

    fn builtin() -> Self {
        let mut registry = Self {
            fakes: BTreeMap::new(),
        };

        registry.register("person.name", |rng| text(Name().fake_with_rng(rng)));
        registry.register("person.first_name", |rng| text(FirstName().fake_with_rng(rng)));
        registry.register("person.last_name", |rng| text(LastName().fake_with_rng(rng)));
        registry.register("person.title", |rng| text(Title().fake_with_rng(rng)));
        registry.register("person.suffix", |rng| text(Suffix().fake_with_rng(rng)));

        registry.register("internet.email", |rng| text(SafeEmail().fake_with_rng(rng)));
        registry.register("internet.free_email", |rng| text(FreeEmail().fake_with_rng(rng)));
        registry.register("internet.user", |rng| text(Username().fake_with_rng(rng)));
        registry.register("internet.password", |rng| {
            text(Password(8..16).fake_with_rng(rng))
        });
        registry.register("internet.domain", |rng| text(domain(rng)));
        registry.register("internet.url", |rng| text(format!("https://www.{}", domain(rng))));
        registry.register("internet.ipv4", |rng| text(IPv4().fake_with_rng(rng)));
        registry.register("internet.ipv6", |rng| text(IPv6().fake_with_rng(rng)));
        registry.register("internet.mac_address", |rng| {
            text(MACAddress().fake_with_rng(rng))
        });
        registry.register("internet.user_agent", |rng| text(UserAgent().fake_with_rng(rng)));

        registry.register("address.city", |rng| text(CityName().fake_with_rng(rng)));
        registry.register("address.country", |rng| text(CountryName().fake_with_rng(rng)));
        registry.register("address.country_code", |rng| {
            text(CountryCode().fake_with_rng(rng))
        });
        registry.register("address.street_name", |rng| text(StreetName().fake_with_rng(rng)));
        registry.register("address.building_number", |rng| {
            text(BuildingNumber().fake_with_rng(rng))
        });
        registry.register("address.state", |rng| text(StateName().fake_with_rng(rng)));
        registry.register("address.state_abbr", |rng| text(StateAbbr().fake_with_rng(rng)));
        registry.register("address.post_code", |rng| text(PostCode().fake_with_rng(rng)));
        registry.register("address.zip_code", |rng| text(ZipCode().fake_with_rng(rng)));

        registry.register("company.name", |rng| text(CompanyName().fake_with_rng(rng)));
        registry.register("company.industry", |rng| text(Industry().fake_with_rng(rng)));
        registry.register("company.buzzword", |rng| text(Buzzword().fake_with_rng(rng)));
        registry.register("company.catch_phrase", |rng| {
            text(CatchPhrase().fake_with_rng(rng))
        });
        registry.register("job.title", |rng| text(JobTitle().fake_with_rng(rng)));
        registry.register("job.field", |rng| text(JobField().fake_with_rng(rng)));

        registry.register("phone.number", |rng| text(PhoneNumber().fake_with_rng(rng)));
        registry.register("phone.cell_number", |rng| text(CellNumber().fake_with_rng(rng)));

        registry.register("lorem.word", |rng| text(Word().fake_with_rng(rng)));
        registry.register("lorem.sentence", |rng| text(Sentence(3..10).fake_with_rng(rng)));
        registry.register("lorem.paragraph", |rng| text(Paragraph(1..3).fake_with_rng(rng)));

        registry.register("payment.credit_card_number", |rng| {
            text(CreditCardNumber().fake_with_rng(rng))
        });
        registry.register("currency.code", |rng| text(CurrencyCode().fake_with_rng(rng)));
        registry.register("currency.name", |rng| text(CurrencyName().fake_with_rng(rng)));

        registry.register("file.name", |rng| text(FileName().fake_with_rng(rng)));
        registry.register("file.path", |rng| text(FilePath().fake_with_rng(rng)));
        registry.register("file.extension", |rng| text(FileExtension().fake_with_rng(rng)));

        registry.register("uuid.v4", |rng| MixedValue::String(random_uuid(rng)));
        registry.register("number.digit", |rng| MixedValue::Int(rng.random_range(0..10)));
        registry.register("number.int", |rng| {
            MixedValue::Int(i64::from(rng.random_range(0..=u32::MAX)))
        });
        registry.register("number.float", |rng| MixedValue::Float(rng.random_range(0.0..1000.0)));
        registry.register("boolean.bool", |rng| MixedValue::Bool(rng.random_bool(0.5)));

        registry
    }

    fn register(&mut self, id: &'static str, func: FakeFn) {
        self.fakes.insert(id, func);
    }
}

fn text(value: String) -> MixedValue {
    MixedValue::String(value)
}

fn domain(rng: &mut dyn RngCore) -> String {
    let word: String = Word().fake_with_rng(rng);
    let suffix: String = DomainSuffix().fake_with_rng(rng);
    format!("{}.{suffix}", word.to_lowercase())
}

/// Random RFC 4122 version 4 UUID.
pub fn random_uuid(rng: &mut dyn RngCore) -> String {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    uuid::Uuid::from_bytes(bytes).to_string()
}

/// Random hostname such as `dolor.com`.
pub fn random_hostname(rng: &mut dyn RngCore) -> String {
    domain(rng)
}

/// Replaces `?` with a random lowercase letter and `#` with a random digit.
pub fn bothify(pattern: &str, rng: &mut dyn RngCore) -> String {
    pattern
        .chars()
        .map(|ch| match ch {
            '?' => char::from(b'a' + rng.random_range(0..26_u8)),
            '#' => char::from(b'0' + rng.random_range(0..10_u8)),
            other => other,
        })
        .collect()
}
