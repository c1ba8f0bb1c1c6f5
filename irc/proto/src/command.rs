#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /* Connection Messages */
    /// <password>
    PASS(String),
    /// <nickname>
    NICK(String),
    /// <username> <realname>
    USER(String, String),
    /// <token>
    PING(String),
    /// [<server>] <token>
    PONG(String, Option<String>),
    /// [<reason>]
    QUIT(Option<String>),
    /// <reason>
    ERROR(String),

    /* Channel Operations */
    /// <channel>{,<channel>} [<key>{,<key>}]
    JOIN(String, Option<String>),
    /// <channel>{,<channel>} [<reason>]
    PART(String, Option<String>),
    /// <channel> [<topic>]
    TOPIC(String, Option<String>),
    /// <channel>{,<channel>}
    NAMES(String),
    /// <channel> <user> [<comment>]
    KICK(String, String, Option<String>),

    /* Sending Messages */
    /// <target>{,<target>} <text to be sent>
    PRIVMSG(String, String),
    /// <target>{,<target>} <text to be sent>
    NOTICE(String, String),

    /* User-Based Queries */
    /// <mask>
    WHO(String),
    /// <nick>
    WHOIS(String),
    /// <nickname> <comment>
    KILL(String, String),

    /* Optional Messages */
    /// [<text>]
    AWAY(Option<String>),

    Numeric(Numeric, Vec<String>),
    Unknown(String, Vec<String>),
    Raw(String),
}

impl Command {
    pub fn new(tag: &str, parameters: Vec<String>) -> Self {
        use Command::*;

        if let Ok(num) = tag.parse::<u16>() {
            return match self::Numeric::try_from(num) {
                Ok(numeric) => Numeric(numeric, parameters),
                Err(()) => Unknown(tag.to_string(), parameters),
            };
        }

        let tag = tag.to_uppercase();
        let len = parameters.len();

        let mut params = parameters.into_iter();

        macro_rules! req {
            () => {
                params.next().unwrap()
            };
        }
        macro_rules! opt {
            () => {
                params.next()
            };
        }

        match tag.as_str() {
            "PASS" if len > 0 => PASS(req!()),
            "NICK" if len > 0 => NICK(req!()),
            "USER" if len > 1 => USER(req!(), req!()),
            "PING" if len > 0 => PING(req!()),
            "PONG" if len > 0 => PONG(req!(), opt!()),
            "QUIT" => QUIT(opt!()),
            "ERROR" if len > 0 => ERROR(req!()),
            "JOIN" if len > 0 => JOIN(req!(), opt!()),
            "PART" if len > 0 => PART(req!(), opt!()),
            "TOPIC" if len > 0 => TOPIC(req!(), opt!()),
            "NAMES" if len > 0 => NAMES(req!()),
            "KICK" if len > 1 => KICK(req!(), req!(), opt!()),
            "PRIVMSG" if len > 1 => PRIVMSG(req!(), req!()),
            "NOTICE" if len > 1 => NOTICE(req!(), req!()),
            "WHO" if len > 0 => WHO(req!()),
            "WHOIS" if len > 0 => WHOIS(req!()),
            "KILL" if len > 1 => KILL(req!(), req!()),
            "AWAY" => AWAY(opt!()),
            _ => Unknown(tag, params.collect()),
        }
    }

    pub fn parameters(self) -> Vec<String> {
        match self {
            Command::PASS(a) => vec![a],
            Command::NICK(a) => vec![a],
            Command::USER(a, b) => vec![a, "0".into(), "*".into(), b],
            Command::PING(a) => vec![a],
            Command::PONG(a, b) => std::iter::once(a).chain(b).collect(),
            Command::QUIT(a) => a.into_iter().collect(),
            Command::ERROR(a) => vec![a],
            Command::JOIN(a, b) => std::iter::once(a).chain(b).collect(),
            Command::PART(a, b) => std::iter::once(a).chain(b).collect(),
            Command::TOPIC(a, b) => std::iter::once(a).chain(b).collect(),
            Command::NAMES(a) => vec![a],
            Command::KICK(a, b, c) => {
                std::iter::once(a).chain(Some(b)).chain(c).collect()
            }
            Command::PRIVMSG(a, b) => vec![a, b],
            Command::NOTICE(a, b) => vec![a, b],
            Command::WHO(a) => vec![a],
            Command::WHOIS(a) => vec![a],
            Command::KILL(a, b) => vec![a, b],
            Command::AWAY(a) => a.into_iter().collect(),
            Command::Numeric(_, params) => params,
            Command::Unknown(_, params) => params,
            Command::Raw(_) => vec![],
        }
    }

    pub fn command(&self) -> String {
        use Command::*;

        match self {
            PASS(_) => "PASS".to_string(),
            NICK(_) => "NICK".to_string(),
            USER(_, _) => "USER".to_string(),
            PING(_) => "PING".to_string(),
            PONG(_, _) => "PONG".to_string(),
            QUIT(_) => "QUIT".to_string(),
            ERROR(_) => "ERROR".to_string(),
            JOIN(_, _) => "JOIN".to_string(),
            PART(_, _) => "PART".to_string(),
            TOPIC(_, _) => "TOPIC".to_string(),
            NAMES(_) => "NAMES".to_string(),
            KICK(_, _, _) => "KICK".to_string(),
            PRIVMSG(_, _) => "PRIVMSG".to_string(),
            NOTICE(_, _) => "NOTICE".to_string(),
            WHO(_) => "WHO".to_string(),
            WHOIS(_) => "WHOIS".to_string(),
            KILL(_, _) => "KILL".to_string(),
            AWAY(_) => "AWAY".to_string(),
            Numeric(numeric, _) => format!("{:03}", *numeric as u16),
            Unknown(tag, _) => tag.clone(),
            Raw(_) => String::new(),
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Numeric {
    RPL_WELCOME = 1,
    RPL_YOURHOST = 2,
    RPL_CREATED = 3,
    RPL_MYINFO = 4,
    RPL_ISUPPORT = 5,
    RPL_AWAY = 301,
    RPL_UNAWAY = 305,
    RPL_NOWAWAY = 306,
    RPL_WHOISUSER = 311,
    RPL_WHOISSERVER = 312,
    RPL_WHOISOPERATOR = 313,
    RPL_ENDOFWHO = 315,
    RPL_WHOISIDLE = 317,
    RPL_ENDOFWHOIS = 318,
    RPL_WHOISCHANNELS = 319,
    RPL_NOTOPIC = 331,
    RPL_TOPIC = 332,
    RPL_TOPICWHOTIME = 333,
    RPL_WHOREPLY = 352,
    RPL_NAMREPLY = 353,
    RPL_ENDOFNAMES = 366,
    RPL_MOTD = 372,
    RPL_MOTDSTART = 375,
    RPL_ENDOFMOTD = 376,
    ERR_NOSUCHNICK = 401,
    ERR_NOSUCHCHANNEL = 403,
    ERR_UNKNOWNCOMMAND = 421,
    ERR_ERRONEUSNICKNAME = 432,
    ERR_NICKNAMEINUSE = 433,
    ERR_NICKCOLLISION = 436,
    ERR_NOTONCHANNEL = 442,
    ERR_NEEDMOREPARAMS = 461,
    ERR_BADCHANNELKEY = 475,
}

impl TryFrom<u16> for Numeric {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        use Numeric::*;

        Ok(match value {
            1 => RPL_WELCOME,
            2 => RPL_YOURHOST,
            3 => RPL_CREATED,
            4 => RPL_MYINFO,
            5 => RPL_ISUPPORT,
            301 => RPL_AWAY,
            305 => RPL_UNAWAY,
            306 => RPL_NOWAWAY,
            311 => RPL_WHOISUSER,
            312 => RPL_WHOISSERVER,
            313 => RPL_WHOISOPERATOR,
            315 => RPL_ENDOFWHO,
            317 => RPL_WHOISIDLE,
            318 => RPL_ENDOFWHOIS,
            319 => RPL_WHOISCHANNELS,
            331 => RPL_NOTOPIC,
            332 => RPL_TOPIC,
            333 => RPL_TOPICWHOTIME,
            352 => RPL_WHOREPLY,
            353 => RPL_NAMREPLY,
            366 => RPL_ENDOFNAMES,
            372 => RPL_MOTD,
            375 => RPL_MOTDSTART,
            376 => RPL_ENDOFMOTD,
            401 => ERR_NOSUCHNICK,
            403 => ERR_NOSUCHCHANNEL,
            421 => ERR_UNKNOWNCOMMAND,
            432 => ERR_ERRONEUSNICKNAME,
            433 => ERR_NICKNAMEINUSE,
            436 => ERR_NICKCOLLISION,
            442 => ERR_NOTONCHANNEL,
            461 => ERR_NEEDMOREPARAMS,
            475 => ERR_BADCHANNELKEY,
            _ => return Err(()),
        })
    }
}
