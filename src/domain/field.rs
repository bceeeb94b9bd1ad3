use std::fmt;

/// Named inputs of the ticket form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ContactName,
    CompanyName,
    ContactEmail,
    ContactPhone,
    Priority,
    Title,
    Description,
    ServiceTags,
    Source,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::ContactName,
        Field::CompanyName,
        Field::ContactEmail,
        Field::ContactPhone,
        Field::Priority,
        Field::Title,
        Field::Description,
        Field::ServiceTags,
        Field::Source,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ContactName => "contact_name",
            Field::CompanyName => "company_name",
            Field::ContactEmail => "contact_email",
            Field::ContactPhone => "contact_phone",
            Field::Priority => "priority",
            Field::Title => "title",
            Field::Description => "description",
            Field::ServiceTags => "service_tag_names",
            Field::Source => "source",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value.trim())
    }

    /// Label shown next to the input.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ContactName => "Nombre completo",
            Field::CompanyName => "Nombre de la empresa",
            Field::ContactEmail => "Email",
            Field::ContactPhone => "Teléfono",
            Field::Priority => "Prioridad",
            Field::Title => "Título",
            Field::Description => "Descripción del problema",
            Field::ServiceTags => "Identificadores (Service Tag)",
            Field::Source => "Origen",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!(Field::from_str("contact_email"), Some(Field::ContactEmail));
        assert_eq!(
            Field::from_str("service_tag_names"),
            Some(Field::ServiceTags)
        );
        assert_eq!(Field::from_str("unknown"), None);
    }
}
