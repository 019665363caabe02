//! Cold email brief: the request body and the prompt built from it.

use serde::{Deserialize, Serialize};

use crate::conversation::Message;

const COPYWRITER_PROMPT: &str = "Eres un copywriter experto que escribe cold emails efectivos \
    para freelancers que quieren conseguir nuevos clientes. \
    Escribe emails claros, concisos que suenen humanos y respetuosos. \
    Siempre adáptate al idioma y tono solicitados. \
    No inventes datos sobre el freelancer o el cliente.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailTone {
    Casual,
    #[default]
    Professional,
    Friendly,
}

impl EmailTone {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Friendly => "friendly",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailLanguage {
    #[default]
    En,
    Es,
}

impl EmailLanguage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColdEmailRequest {
    /// Who the freelancer is and what they do.
    pub freelancer_profile: String,
    pub client_business: String,
    pub client_pain_point: String,
    pub offer: String,
    /// Action the client should take (call, reply, ...).
    pub goal: String,
    #[serde(default)]
    pub tone: EmailTone,
    #[serde(default)]
    pub language: EmailLanguage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ColdEmailResponse {
    pub email: String,
}

impl ColdEmailRequest {
    /// Builds the copywriter conversation for this brief.
    pub fn to_messages(&self) -> Vec<Message> {
        let brief = format!(
            "Perfil del freelancer: {}\n\
             Negocio del cliente: {}\n\
             Punto de dolor del cliente: {}\n\
             Oferta: {}\n\
             Objetivo del email: {}\n\
             Tono: {}\n\
             Idioma: {}\n\n\
             Escribe un cold email que el freelancer pueda enviar a este cliente. \
             Si el idioma es 'en', escribe en Inglés. Si es 'es', escribe en Español. \
             El email debe estar listo para copiar y pegar.",
            self.freelancer_profile,
            self.client_business,
            self.client_pain_point,
            self.offer,
            self.goal,
            self.tone.as_str(),
            self.language.as_str(),
        );

        vec![Message::system(COPYWRITER_PROMPT), Message::user(brief)]
    }
}
