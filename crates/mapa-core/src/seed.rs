//! Built-in seed: the "Out of Time" channel strategy manual.

use crate::tree::{MindTree, NodeKind, TreeNode};
use std::sync::Arc;

fn category(id: &str, name: &str, items: &[(&str, &str)]) -> TreeNode {
    TreeNode::new(id, name, NodeKind::Category)
        .with_children(items.iter().map(|(id, name)| TreeNode::item(*id, *name)))
}

pub fn strategic_manual_root() -> TreeNode {
    TreeNode::new(
        "root",
        "Manual Estratégico: Canal de Simulação de Sobrevivência Imersiva",
        NodeKind::Root,
    )
    .with_children([
        category(
            "nicho",
            "Definição de Nicho",
            &[
                ("n1", "Nicho: Immersive Survival Simulation"),
                (
                    "n2",
                    "Subnicho: First-Person Human Survival in Hostile Past Worlds",
                ),
                ("n3", "Diferencial: Vivência simulada plausível"),
            ],
        ),
        category(
            "identidade",
            "Identidade da Marca",
            &[
                (
                    "i1",
                    "Posicionamento: Máquina de teste de sobrevivência humana",
                ),
                ("i2", "Nome Sugerido: Out of Time"),
                ("i3", "Slogan: Testing human survival beyond our time"),
            ],
        ),
        category(
            "diretrizes",
            "Diretrizes de Conteúdo",
            &[
                ("d1", "Regras: Narrativa imersiva, tom sério, sem humor"),
                (
                    "d2",
                    "Persona: Narrador observador neutro (máquina do tempo)",
                ),
                (
                    "d3",
                    "Jargões: Frases recorrentes sobre limites biológicos",
                ),
            ],
        ),
        category(
            "estrutura",
            "Estrutura do Vídeo",
            &[
                (
                    "e1",
                    "Lógica Interna: Inserção, ameaça, adaptação e veredito",
                ),
                ("e2", "Roteiro: Blocos de 900-1100 caracteres"),
                ("e3", "Duração: Aproximadamente 12 minutos"),
            ],
        ),
        category(
            "politicas",
            "Políticas e Segurança",
            &[
                ("p1", "Safe for Ads: Evitar gore e violência gráfica"),
                (
                    "p2",
                    "Narrativa: Descrever limites em vez de mortes explícitas",
                ),
            ],
        ),
        category(
            "prompts",
            "Prompts de Produção",
            &[
                ("pr1", "Roteiro: Estilo documental cinematográfico"),
                ("pr2", "Imagens: Ultra-realistas, perspectiva humana, 16:9"),
                ("pr3", "Vídeo: Movimentos lentos e foco na atmosfera"),
            ],
        ),
    ])
}

/// The seed tree. Its ids are unique and only the entry point has type `root`.
pub fn strategic_manual() -> MindTree {
    MindTree::from_validated(Arc::new(strategic_manual_root()))
}
