//! Static account lists, in catalog order.

use super::types::{Account, AccountKind};

const fn synthetic(
    code: &'static str,
    group: &'static str,
    subgroup: &'static str,
    name: &'static str,
) -> Account {
    Account {
        code,
        group,
        subgroup,
        kind: AccountKind::Synthetic,
        name,
    }
}

const fn analytic(
    code: &'static str,
    group: &'static str,
    subgroup: &'static str,
    name: &'static str,
) -> Account {
    Account {
        code,
        group,
        subgroup,
        kind: AccountKind::Analytic,
        name,
    }
}

pub(super) static EXPENSE_ACCOUNTS: &[Account] = &[
    synthetic("1", "DESPESAS CORRENTES", "", "Despesas Correntes"),
    synthetic("1.1", "DESPESAS CORRENTES", "Pessoal e Encargos", "Pessoal e Encargos"),
    synthetic("1.1.1", "DESPESAS CORRENTES", "Pessoal e Encargos", "Remuneração de Pessoal"),
    analytic("1.1.1.1", "DESPESAS CORRENTES", "Pessoal e Encargos", "Salários"),
    analytic("1.1.1.2", "DESPESAS CORRENTES", "Pessoal e Encargos", "Férias"),
    analytic("1.1.1.3", "DESPESAS CORRENTES", "Pessoal e Encargos", "Décimo Terceiro Salário"),
    analytic("1.1.1.4", "DESPESAS CORRENTES", "Pessoal e Encargos", "Gratificações e Funções Comissionadas"),
    synthetic("1.1.2", "DESPESAS CORRENTES", "Pessoal e Encargos", "Encargos Sociais"),
    analytic("1.1.2.1", "DESPESAS CORRENTES", "Pessoal e Encargos", "INSS Patronal"),
    analytic("1.1.2.2", "DESPESAS CORRENTES", "Pessoal e Encargos", "FGTS"),
    analytic("1.1.2.3", "DESPESAS CORRENTES", "Pessoal e Encargos", "PIS sobre Folha de Pagamento"),
    synthetic("1.1.3", "DESPESAS CORRENTES", "Pessoal e Encargos", "Benefícios a Pessoal"),
    analytic("1.1.3.1", "DESPESAS CORRENTES", "Pessoal e Encargos", "Auxílio-Alimentação"),
    analytic("1.1.3.2", "DESPESAS CORRENTES", "Pessoal e Encargos", "Auxílio-Transporte"),
    analytic("1.1.3.3", "DESPESAS CORRENTES", "Pessoal e Encargos", "Assistência Médica e Odontológica"),
    synthetic("1.2", "DESPESAS CORRENTES", "Serviços de Terceiros", "Serviços de Terceiros"),
    synthetic("1.2.1", "DESPESAS CORRENTES", "Serviços de Terceiros", "Serviços de Terceiros - Pessoa Jurídica"),
    analytic("1.2.1.1", "DESPESAS CORRENTES", "Serviços de Terceiros", "Serviços de Tecnologia da Informação"),
    analytic("1.2.1.2", "DESPESAS CORRENTES", "Serviços de Terceiros", "Limpeza e Conservação"),
    analytic("1.2.1.3", "DESPESAS CORRENTES", "Serviços de Terceiros", "Vigilância e Segurança"),
    analytic("1.2.1.4", "DESPESAS CORRENTES", "Serviços de Terceiros", "Energia Elétrica"),
    analytic("1.2.1.5", "DESPESAS CORRENTES", "Serviços de Terceiros", "Telefonia e Internet"),
    analytic("1.2.1.6", "DESPESAS CORRENTES", "Serviços de Terceiros", "Locação de Imóveis"),
    analytic("1.2.1.7", "DESPESAS CORRENTES", "Serviços de Terceiros", "Publicidade e Divulgação"),
    synthetic("1.2.2", "DESPESAS CORRENTES", "Serviços de Terceiros", "Serviços de Terceiros - Pessoa Física"),
    analytic("1.2.2.1", "DESPESAS CORRENTES", "Serviços de Terceiros", "Consultoria e Assessoria"),
    analytic("1.2.2.2", "DESPESAS CORRENTES", "Serviços de Terceiros", "Jetons e Gratificações de Conselheiros"),
    synthetic("1.3", "DESPESAS CORRENTES", "Diárias e Passagens", "Diárias e Passagens"),
    analytic("1.3.1", "DESPESAS CORRENTES", "Diárias e Passagens", "Diárias"),
    analytic("1.3.2", "DESPESAS CORRENTES", "Diárias e Passagens", "Passagens e Despesas com Locomoção"),
    synthetic("1.4", "DESPESAS CORRENTES", "Material de Consumo", "Material de Consumo"),
    analytic("1.4.1", "DESPESAS CORRENTES", "Material de Consumo", "Material de Expediente"),
    analytic("1.4.2", "DESPESAS CORRENTES", "Material de Consumo", "Combustíveis e Lubrificantes"),
    analytic("1.4.3", "DESPESAS CORRENTES", "Material de Consumo", "Material de Limpeza e Higienização"),
    synthetic("1.5", "DESPESAS CORRENTES", "Transferências Correntes", "Transferências Correntes"),
    analytic("1.5.1", "DESPESAS CORRENTES", "Transferências Correntes", "Cota-Parte ao CFA"),
    analytic("1.5.2", "DESPESAS CORRENTES", "Transferências Correntes", "Contribuições e Convênios"),
    synthetic("1.6", "DESPESAS CORRENTES", "Encargos Diversos", "Encargos Diversos"),
    analytic("1.6.1", "DESPESAS CORRENTES", "Encargos Diversos", "Tributos e Taxas"),
    analytic("1.6.2", "DESPESAS CORRENTES", "Encargos Diversos", "Despesas Bancárias"),
    analytic("1.6.3", "DESPESAS CORRENTES", "Encargos Diversos", "Indenizações e Restituições"),
    synthetic("2", "DESPESAS DE CAPITAL", "", "Despesas de Capital"),
    synthetic("2.1", "DESPESAS DE CAPITAL", "Investimentos", "Investimentos"),
    analytic("2.1.1", "DESPESAS DE CAPITAL", "Investimentos", "Equipamentos e Material Permanente"),
    analytic("2.1.2", "DESPESAS DE CAPITAL", "Investimentos", "Softwares e Licenças"),
    analytic("2.1.3", "DESPESAS DE CAPITAL", "Investimentos", "Obras e Instalações"),
    synthetic("2.2", "DESPESAS DE CAPITAL", "Inversões Financeiras", "Inversões Financeiras"),
    analytic("2.2.1", "DESPESAS DE CAPITAL", "Inversões Financeiras", "Aquisição de Imóveis"),
];

pub(super) static REVENUE_ACCOUNTS: &[Account] = &[
    synthetic("1", "RECEITAS CORRENTES", "", "Receitas Correntes"),
    synthetic("1.1", "RECEITAS CORRENTES", "Receitas de Contribuições", "Receitas de Contribuições"),
    analytic("1.1.1", "RECEITAS CORRENTES", "Receitas de Contribuições", "Anuidades de Pessoas Físicas"),
    analytic("1.1.2", "RECEITAS CORRENTES", "Receitas de Contribuições", "Anuidades de Pessoas Jurídicas"),
    analytic("1.1.3", "RECEITAS CORRENTES", "Receitas de Contribuições", "Anuidades de Exercícios Anteriores"),
    synthetic("1.2", "RECEITAS CORRENTES", "Receita Patrimonial", "Receita Patrimonial"),
    analytic("1.2.1", "RECEITAS CORRENTES", "Receita Patrimonial", "Rendimentos de Aplicações Financeiras"),
    analytic("1.2.2", "RECEITAS CORRENTES", "Receita Patrimonial", "Aluguéis e Arrendamentos"),
    synthetic("1.3", "RECEITAS CORRENTES", "Receitas de Serviços", "Receitas de Serviços"),
    analytic("1.3.1", "RECEITAS CORRENTES", "Receitas de Serviços", "Taxas de Inscrição e Registro"),
    analytic("1.3.2", "RECEITAS CORRENTES", "Receitas de Serviços", "Emissão de Certidões e Carteiras"),
    analytic("1.3.3", "RECEITAS CORRENTES", "Receitas de Serviços", "Eventos e Cursos"),
    synthetic("1.4", "RECEITAS CORRENTES", "Outras Receitas Correntes", "Outras Receitas Correntes"),
    analytic("1.4.1", "RECEITAS CORRENTES", "Outras Receitas Correntes", "Multas e Juros de Mora"),
    analytic("1.4.2", "RECEITAS CORRENTES", "Outras Receitas Correntes", "Dívida Ativa"),
    analytic("1.4.3", "RECEITAS CORRENTES", "Outras Receitas Correntes", "Receitas Diversas"),
    synthetic("2", "RECEITAS DE CAPITAL", "", "Receitas de Capital"),
    synthetic("2.1", "RECEITAS DE CAPITAL", "Alienação de Bens", "Alienação de Bens"),
    analytic("2.1.1", "RECEITAS DE CAPITAL", "Alienação de Bens", "Alienação de Bens Móveis"),
    analytic("2.1.2", "RECEITAS DE CAPITAL", "Alienação de Bens", "Alienação de Bens Imóveis"),
    synthetic("2.2", "RECEITAS DE CAPITAL", "Transferências de Capital", "Transferências de Capital"),
    analytic("2.2.1", "RECEITAS DE CAPITAL", "Transferências de Capital", "Auxílios do CFA"),
];
