use rand::Rng;

use crate::domain::draft::TicketDraft;
use crate::domain::ticket::Priority;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Luis", "María", "Jorge", "Carla", "Diego", "Rosa", "Miguel", "Lucía", "Pedro",
];
const LAST_NAMES: &[&str] = &[
    "Torres", "Quispe", "Rojas", "Flores", "Mendoza", "Vargas", "Castillo", "Huamán",
];
const COMPANIES: &[(&str, &str)] = &[
    ("Andes Logística", "andeslogistica.pe"),
    ("Inversiones Pacífico", "pacifico.com.pe"),
    ("Grupo Miraflores", "grupomiraflores.pe"),
    ("Textiles del Sur", "textilesdelsur.com"),
    ("Clínica San Borja", "sanborja.pe"),
];
const ISSUES: &[(&str, &str)] = &[
    (
        "Laptop no enciende",
        "El equipo no muestra señal de vida al presionar el botón de encendido.",
    ),
    (
        "Pantalla con líneas verticales",
        "Desde esta mañana el monitor muestra líneas verticales de colores.",
    ),
    (
        "Impresora no detectada",
        "La impresora de red dejó de aparecer en las estaciones de trabajo.",
    ),
    (
        "Batería no carga",
        "El indicador de carga permanece apagado con el cargador conectado.",
    ),
    (
        "Teclado con teclas bloqueadas",
        "Varias teclas no responden después de una actualización del sistema.",
    ),
];
const TAG_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ0123456789";

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &'a [&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

fn service_tag<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..7)
        .map(|_| TAG_ALPHABET[rng.random_range(0..TAG_ALPHABET.len())] as char)
        .collect()
}

/// Fills every field of a draft with plausible test data.
pub fn random_draft<R: Rng + ?Sized>(rng: &mut R) -> TicketDraft {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let (company, domain) = COMPANIES[rng.random_range(0..COMPANIES.len())];
    let (title, description) = ISSUES[rng.random_range(0..ISSUES.len())];
    let priority = Priority::ALL[rng.random_range(0..Priority::ALL.len())];

    let mut draft = TicketDraft {
        contact_name: format!("{first} {last}"),
        company_name: company.to_string(),
        contact_email: format!(
            "{}.{}@{domain}",
            ascii_lower(first),
            ascii_lower(last)
        ),
        contact_phone: format!(
            "+51 9{:02} {:03} {:03}",
            rng.random_range(0..100),
            rng.random_range(0..1000),
            rng.random_range(0..1000)
        ),
        priority: priority.as_str().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        ..TicketDraft::default()
    };

    for _ in 0..rng.random_range(1..=3) {
        draft.add_service_tag(&service_tag(rng));
    }
    draft
}

fn ascii_lower(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
