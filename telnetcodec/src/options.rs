//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::consts;

///
/// [Telnet Terminal Options](https://www.iana.org/assignments/telnet-options/telnet-options.xhtml)
///
/// Only the options this client recognizes by name get a variant; everything
/// else round-trips through [`TelnetOption::Unknown`].
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetOption {
    /// [`consts::option::BINARY`] Telnet Binary Transmission [RFC856](https://tools.ietf.org/html/rfc856)
    TransmitBinary,
    /// [`consts::option::ECHO`] Telnet Echo Option [RFC857](https://tools.ietf.org/html/rfc857)
    Echo,
    /// [`consts::option::SGA`] Suppress Go ahead [RFC858](https://tools.ietf.org/html/rfc858)
    SuppressGoAhead,
    /// [`consts::option::STATUS`] Telnet Status Option [RFC859](http://www.iana.org/go/rfc859)
    Status,
    /// [`consts::option::TM`] Telnet Timing Mark Option [RFC860](http://www.iana.org/go/rfc860)
    TimingMark,
    /// [`consts::option::TTYPE`] Terminal Type [RFC1091](http://www.iana.org/go/rfc1091)
    TTYPE,
    /// [`consts::option::NAWS`] Negotiate About Window Size [RFC1073](http://www.iana.org/go/rfc1073)
    NAWS,
    /// [`consts::option::TSPEED`] Terminal Speed [RFC1079](http://www.iana.org/go/rfc1079)
    TSPEED,
    /// [`consts::option::LFLOW`] Remote Flow Control [RFC1372](http://www.iana.org/go/rfc1372)
    LFLOW,
    /// [`consts::option::LINEMODE`] Linemode [RFC1184](http://www.iana.org/go/rfc1184)
    Linemode,
    /// [`consts::option::XDISPLOC`] X Display Location [RFC1096](http://www.iana.org/go/rfc1096)
    XDISPLOC,
    /// [`consts::option::OLD_ENVIRONMENT`] Environment Option [RFC1408](http://www.iana.org/go/rfc1408)
    Environment,
    /// [`consts::option::AUTHENTICATION`] Authentication Option [RFC2941](http://www.iana.org/go/rfc2941)
    Authentication,
    /// [`consts::option::ENCRYPTION`] Encryption Option [RFC2946](http://www.iana.org/go/rfc2946)
    Encryption,
    /// [`consts::option::NEW_ENVIRONMENT`] New Environment Option [RFC1572](http://www.iana.org/go/rfc1572)
    NewEnvironment,
    /// [`consts::option::CHARSET`] Charset [RFC2066](http://www.iana.org/go/rfc2066)
    Charset,
    /// Unknown Option
    Unknown(u8),
}

impl TelnetOption {
    /// Converts a `TelnetOption` into its wire byte.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => consts::option::BINARY,
            TelnetOption::Echo => consts::option::ECHO,
            TelnetOption::SuppressGoAhead => consts::option::SGA,
            TelnetOption::Status => consts::option::STATUS,
            TelnetOption::TimingMark => consts::option::TM,
            TelnetOption::TTYPE => consts::option::TTYPE,
            TelnetOption::NAWS => consts::option::NAWS,
            TelnetOption::TSPEED => consts::option::TSPEED,
            TelnetOption::LFLOW => consts::option::LFLOW,
            TelnetOption::Linemode => consts::option::LINEMODE,
            TelnetOption::XDISPLOC => consts::option::XDISPLOC,
            TelnetOption::Environment => consts::option::OLD_ENVIRONMENT,
            TelnetOption::Authentication => consts::option::AUTHENTICATION,
            TelnetOption::Encryption => consts::option::ENCRYPTION,
            TelnetOption::NewEnvironment => consts::option::NEW_ENVIRONMENT,
            TelnetOption::Charset => consts::option::CHARSET,
            TelnetOption::Unknown(byte) => *byte,
        }
    }

    /// Converts a wire byte into a `TelnetOption`, falling back to
    /// [`TelnetOption::Unknown`] for codes without a named variant.
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            consts::option::BINARY => TelnetOption::TransmitBinary,
            consts::option::ECHO => TelnetOption::Echo,
            consts::option::SGA => TelnetOption::SuppressGoAhead,
            consts::option::STATUS => TelnetOption::Status,
            consts::option::TM => TelnetOption::TimingMark,
            consts::option::TTYPE => TelnetOption::TTYPE,
            consts::option::NAWS => TelnetOption::NAWS,
            consts::option::TSPEED => TelnetOption::TSPEED,
            consts::option::LFLOW => TelnetOption::LFLOW,
            consts::option::LINEMODE => TelnetOption::Linemode,
            consts::option::XDISPLOC => TelnetOption::XDISPLOC,
            consts::option::OLD_ENVIRONMENT => TelnetOption::Environment,
            consts::option::AUTHENTICATION => TelnetOption::Authentication,
            consts::option::ENCRYPTION => TelnetOption::Encryption,
            consts::option::NEW_ENVIRONMENT => TelnetOption::NewEnvironment,
            consts::option::CHARSET => TelnetOption::Charset,
            byte => TelnetOption::Unknown(byte),
        }
    }

    /// Whether this client agrees to the option when the remote side asks.
    ///
    /// Everything outside this set is refused.
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            TelnetOption::SuppressGoAhead
                | TelnetOption::TTYPE
                | TelnetOption::TSPEED
                | TelnetOption::NAWS
        )
    }

    /// Whether the option carries a value the remote side can `SEND` for.
    pub fn is_reportable(&self) -> bool {
        matches!(self, TelnetOption::TTYPE | TelnetOption::TSPEED)
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "TransmitBinary"),
            TelnetOption::Echo => write!(f, "Echo"),
            TelnetOption::SuppressGoAhead => write!(f, "SuppressGoAhead"),
            TelnetOption::Status => write!(f, "Status"),
            TelnetOption::TimingMark => write!(f, "TimingMark"),
            TelnetOption::TTYPE => write!(f, "TTYPE"),
            TelnetOption::NAWS => write!(f, "NAWS"),
            TelnetOption::TSPEED => write!(f, "TSPEED"),
            TelnetOption::LFLOW => write!(f, "LFLOW"),
            TelnetOption::Linemode => write!(f, "Linemode"),
            TelnetOption::XDISPLOC => write!(f, "XDISPLOC"),
            TelnetOption::Environment => write!(f, "Environment"),
            TelnetOption::Authentication => write!(f, "Authentication"),
            TelnetOption::Encryption => write!(f, "Encryption"),
            TelnetOption::NewEnvironment => write!(f, "NewEnvironment"),
            TelnetOption::Charset => write!(f, "Charset"),
            TelnetOption::Unknown(byte) => write!(f, "Unknown({byte})"),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        TelnetOption::from_u8(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_named_variants() {
        assert_eq!(TelnetOption::from(1), TelnetOption::Echo);
        assert_eq!(TelnetOption::from(3), TelnetOption::SuppressGoAhead);
        assert_eq!(TelnetOption::from(24), TelnetOption::TTYPE);
        assert_eq!(TelnetOption::from(31), TelnetOption::NAWS);
        assert_eq!(TelnetOption::from(32), TelnetOption::TSPEED);
        assert_eq!(TelnetOption::from(42), TelnetOption::Charset);
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let option = TelnetOption::from(201);
        assert_eq!(option, TelnetOption::Unknown(201));
        assert_eq!(u8::from(option), 201);
        assert_eq!(option.to_string(), "Unknown(201)");
    }

    #[test]
    fn every_named_variant_maps_back_to_its_code() {
        for code in 0..=u8::MAX {
            assert_eq!(TelnetOption::from_u8(code).to_u8(), code);
        }
    }

    #[test]
    fn supported_set_is_the_four_client_options() {
        let supported: Vec<u8> = (0..=u8::MAX)
            .filter(|code| TelnetOption::from(*code).is_supported())
            .collect();
        assert_eq!(supported, vec![3, 24, 31, 32]);
    }
}
