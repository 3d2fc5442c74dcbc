//! pt-BR prompt templates for the four generation stages.

use sw_domain::{Analysis, Answers, ScriptType, Structure};

/// Localized name of the delivery format, as shown to the model.
pub fn type_label(t: ScriptType) -> &'static str {
    match t {
        ScriptType::Tiktok => "TikTok/Reels (vídeos de 30 segundos a 3 minutos)",
        ScriptType::Youtube => "YouTube",
        ScriptType::Marketing => "Marketing/Publicidade",
        ScriptType::Shortfilm => "Curta-metragem",
    }
}

/// Narrative skeleton the structure stage must follow.
pub fn structure_template(t: ScriptType) -> &'static str {
    match t {
        ScriptType::Tiktok => "Gancho (3-5s) → Desenvolvimento (2:30-2:50) → Call-to-Action (5-7s)",
        ScriptType::Youtube => "Introdução (10-15%) → Desenvolvimento (70-80%) → Conclusão (10-15%)",
        ScriptType::Marketing => "Atenção → Interesse → Desejo → Ação (AIDA)",
        ScriptType::Shortfilm => "Três Atos: Apresentação → Confrontação → Resolução",
    }
}

pub fn format_guide(t: ScriptType) -> &'static str {
    match t {
        ScriptType::Tiktok => {
            "Formato Master Scenes com indicações para vertical (9:16), transições rápidas, \
             legendas, e duração de 30 segundos a 3 minutos"
        }
        ScriptType::Youtube => {
            "Formato de roteiro para YouTube com marcações de tempo, B-roll, gráficos"
        }
        ScriptType::Marketing => {
            "Formato publicitário com CTA claro, indicações visuais, copy persuasivo"
        }
        ScriptType::Shortfilm => "Formato cinematográfico padrão (Master Scenes ou Shot List)",
    }
}

const MASTER_SCENE_BASE: &str = "
REGRAS FUNDAMENTAIS DO MASTER SCENE:

1. CABEÇALHOS (Scene Headers/Sluglines):
   - Sempre em MAIÚSCULAS
   - Formato: INT./EXT. LOCALIZAÇÃO - TEMPO
   - Exemplo: INT. CASA DE MARIA - DIA
   - Novo cabeçalho para cada mudança de lugar ou tempo

2. AÇÃO/DESCRIÇÃO:
   - Presente do indicativo
   - Apenas elementos FILMÁVEIS (o que se vê e ouve)
   - Personagens em MAIÚSCULAS na primeira aparição
   - SONS importantes em maiúsculas
   - Objetos importantes em MAIÚSCULAS
   - Evitar \"vemos\", \"câmera mostra\"
   - Não repetir informações do cabeçalho

3. DIÁLOGOS:
   - Nome da personagem centralizado e em MAIÚSCULAS
   - Instruções para ator entre parênteses quando necessário
   - Diálogo natural e brasileiro
   - Evitar excesso de instruções

4. TRANSIÇÕES (quando necessário):
   - CORTA PARA:
   - FUSÃO PARA:
   - FADE IN: (início)
   - FADE OUT. (final)

5. ELEMENTOS ESPECIAIS:
   - POV (ponto de vista)
   - INSERT (close-up de objeto)
   - VOLTA À CENA
   - MONTAGEM/SÉRIE DE PLANOS
";

fn master_scene_addendum(t: ScriptType) -> &'static str {
    match t {
        ScriptType::Tiktok => {
            "
ESPECÍFICO PARA TIKTOK/REELS:
- Indicar orientação VERTICAL (9:16)
- Marcar momentos para LEGENDAS
- Transições RÁPIDAS
- Indicar CALL-TO-ACTION
- Duração: 30 segundos a 3 minutos
- Ritmo acelerado nas descrições"
        }
        ScriptType::Youtube => {
            "
ESPECÍFICO PARA YOUTUBE:
- Marcações de tempo quando relevante
- Indicações de B-ROLL
- Momentos para gráficos/texto
- Estrutura clara: Intro → Desenvolvimento → Conclusão"
        }
        ScriptType::Marketing => {
            "
ESPECÍFICO PARA MARKETING:
- CTA (Call-to-Action) bem definido
- Indicações visuais claras
- Copy persuasivo nos diálogos
- Foco no produto/serviço"
        }
        ScriptType::Shortfilm => {
            "
ESPECÍFICO PARA CURTA-METRAGEM:
- Formato cinematográfico rigoroso
- Estrutura de três atos
- Desenvolvimento de personagens
- Arco narrativo completo"
        }
    }
}

/// Base Master Scene rules followed by the format-specific addendum.
pub fn master_scene_rules(t: ScriptType) -> String {
    format!("{MASTER_SCENE_BASE}{}", master_scene_addendum(t))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

// ── stage prompts ───────────────────────────────────────────────────

pub fn analysis(idea: &str, t: ScriptType) -> String {
    format!(
        r#"
Você é um consultor dramatúrgico especializado em roteiros para o mercado brasileiro.
Analise a seguinte ideia de roteiro para {label}:

IDEIA: "{idea}"

Forneça uma análise detalhada em português brasileiro com:
1. Conflitos identificados
2. Pontos fortes da narrativa
3. Pontos fracos ou áreas para melhorar
4. Estrutura narrativa sugerida
5. Tom da narrativa
6. Público-alvo brasileiro

Responda em JSON com este formato:
{{
  "conflicts": ["conflito1", "conflito2"],
  "strengths": ["ponto forte1", "ponto forte2"],
  "weakPoints": ["ponto fraco1", "ponto fraco2"],
  "suggestedStructure": "estrutura sugerida",
  "tone": "tom identificado",
  "targetAudience": "público-alvo"
}}
"#,
        label = type_label(t),
    )
}

pub fn questions(idea: &str, t: ScriptType, analysis: &Analysis) -> String {
    format!(
        r#"
Baseado na análise da ideia de roteiro para {label},
gere 3-5 perguntas específicas em português brasileiro para refinar o roteiro.

IDEIA: "{idea}"
ANÁLISE: {analysis}

As perguntas devem ser conversacionais e ajudar a:
- Esclarecer conflitos
- Desenvolver personagens
- Definir objetivos específicos
- Identificar o tom desejado
- Determinar call-to-action (para formatos digitais)

Responda em JSON com este formato:
{{
  "questions": [
    {{
      "id": "1",
      "question": "pergunta em português",
      "context": "contexto da pergunta",
      "placeholder": "exemplo de resposta"
    }}
  ]
}}
"#,
        label = type_label(t),
        analysis = to_json(analysis),
    )
}

pub fn structure(idea: &str, t: ScriptType, answers: &Answers) -> String {
    format!(
        r#"
Você é um roteirista experiente especializado em {label} para o mercado brasileiro.

IDEIA ORIGINAL: "{idea}"
RESPOSTAS DO USUÁRIO: {answers}

Crie uma estrutura detalhada seguindo o padrão {template}.

Para cada seção, forneça:
- Nome da seção
- Descrição do que acontece
- Duração estimada em segundos
- Conteúdo específico (diálogos, ações)
- Dicas de produção

Responda em JSON com este formato:
{{
  "sections": [
    {{
      "name": "Nome da Seção",
      "description": "descrição",
      "duration": 30,
      "content": "conteúdo específico",
      "tips": ["dica1", "dica2"]
    }}
  ],
  "totalDuration": 180,
  "format": "{format}"
}}
"#,
        label = type_label(t),
        answers = to_json(answers),
        template = structure_template(t),
        format = t.as_str(),
    )
}

pub fn final_script(idea: &str, t: ScriptType, structure: &Structure, answers: &Answers) -> String {
    format!(
        r#"
Você é um roteirista profissional especializado em conteúdo para o mercado brasileiro.

Crie o roteiro COMPLETO baseado em:
IDEIA: "{idea}"
TIPO: {label}
ESTRUTURA: {structure}
RESPOSTAS: {answers}

FORMATO OBRIGATÓRIO: {guide}

REGRAS DE FORMATAÇÃO MASTER SCENE:
{rules}

O roteiro deve:
- Estar em português brasileiro
- Seguir RIGOROSAMENTE o formato Master Scene
- Incluir diálogos naturais e brasileiros
- Ter indicações técnicas específicas quando necessário
- Incluir notas de produção relevantes
- Ser otimizado para o formato {format}
- Usar APENAS elementos filmáveis nas descrições
- Seguir a regra "1 página = 1 minuto de tela"

Crie um roteiro completo e profissional seguindo EXATAMENTE as regras Master Scene, sem usar marcadores JSON - apenas o texto do roteiro formatado.
"#,
        label = type_label(t),
        structure = to_json(structure),
        answers = to_json(answers),
        guide = format_guide(t),
        rules = master_scene_rules(t),
        format = t.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_distinct_template() {
        let mut seen: Vec<&str> = ScriptType::ALL.iter().map(|t| structure_template(*t)).collect();
        seen.dedup();
        assert_eq!(seen.len(), 4);
        assert!(structure_template(ScriptType::Marketing).contains("AIDA"));
    }

    #[test]
    fn master_scene_rules_append_type_addendum() {
        let rules = master_scene_rules(ScriptType::Tiktok);
        assert!(rules.starts_with("\nREGRAS FUNDAMENTAIS"));
        assert!(rules.contains("VERTICAL (9:16)"));
        assert!(!rules.contains("CURTA-METRAGEM"));
    }

    #[test]
    fn structure_prompt_embeds_answers_and_format() {
        let mut answers = Answers::new();
        answers.insert("cta".into(), "like".into());
        let p = structure("ideia", ScriptType::Tiktok, &answers);
        assert!(p.contains(r#"{"cta":"like"}"#));
        assert!(p.contains(r#""format": "tiktok""#));
        assert!(p.contains("Gancho (3-5s)"));
    }

    #[test]
    fn analysis_prompt_uses_localized_label() {
        let p = analysis("uma ideia", ScriptType::Shortfilm);
        assert!(p.contains("Curta-metragem"));
        assert!(p.contains(r#"IDEIA: "uma ideia""#));
    }
}
