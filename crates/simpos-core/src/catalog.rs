//! Static reference lists served by the simulator.
//!
//! Order is part of the contract: clients may index into these lists.

use crate::types::{Issuer, Wallet};

const fn issuer(marca: &'static str, tipo: &'static str, issuer_id: &'static str) -> Issuer {
    Issuer {
        marca,
        tipo,
        issuer_id,
    }
}

const fn wallet(
    marca: &'static str,
    codigo_billetera: &'static str,
    issuer_id: &'static str,
) -> Wallet {
    Wallet {
        marca,
        codigo_billetera,
        issuer_id,
    }
}

/// Card issuers the terminal recognizes.
pub static ISSUERS: [Issuer; 16] = [
    issuer("CABAL", "Crédito", "CB"),
    issuer("CREDIFIELCO", "Crédito", "CC"),
    issuer("CARTA CLAVE", "Crédito", "CL"),
    issuer("PANAL", "Crédito", "CP"),
    issuer("DINERS", "Crédito", "DC"),
    issuer("INFONET", "Débito", "ID"),
    issuer("MASTERCARD", "Crédito", "MC"),
    issuer("MASTERCARD", "Débito", "MD"),
    issuer("CREDICARD", "Crédito", "PC"),
    issuer("UNICA", "Débito", "UD"),
    issuer("VISA", "Crédito", "VC"),
    issuer("VISA", "Débito", "VD"),
    issuer("TARJETA DEBITO", "Débito", "TD"),
    issuer("TARJETA CREDITO", "Crédito", "TC"),
    issuer("DEBITO EN CUENTA", "Débito", "CD"),
    issuer("AMERICAN EXPRESS", "Crédito", "AC"),
];

/// Mobile wallets the terminal recognizes.
pub static WALLETS: [Wallet; 5] = [
    wallet("ZIMPLE", "ZIM", "ZM"),
    wallet("Paraguayo Japonesa", "WPJ", "PJ"),
    wallet("VISION", "VBV", "VB"),
    wallet("Personal-Itau", "BPI", "PI"),
    wallet("Billetera Viru", "BBF", "BF"),
];
