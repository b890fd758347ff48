//! Génération des identifiants d'items (UUID version 4)

use uuid::{Builder, Uuid};

/// Nouvel identifiant aléatoire, forme textuelle canonique en minuscules
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Identifiant construit à partir de 16 octets fournis par l'appelant
///
/// Les bits de version et de variante sont forcés, le résultat est donc
/// toujours un UUID v4 valide.
pub fn uuid_from_bytes(bytes: [u8; 16]) -> String {
    Builder::from_random_bytes(bytes).into_uuid().to_string()
}
